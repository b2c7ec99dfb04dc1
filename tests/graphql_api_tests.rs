//! Integration tests for the GraphQL API
//!
//! Every test runs against a throwaway SQLite file with migrations applied.
//! Requests carry their own `RequestContext`, exactly as the HTTP handler
//! installs it, so fetch counts can be read back after execution.

use std::sync::Arc;

use async_graphql::{Request, Response, Variables};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use memberboard::db::{CreatePost, CreateProfile, CreateUser, Database};
use memberboard::graphql::{MemberboardSchema, RequestContext, SchemaLimits, build_schema};

const MISSING_ID: &str = "11111111-1111-1111-1111-111111111111";

struct TestApp {
    _dir: TempDir,
    db: Database,
    schema: MemberboardSchema,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let db = Database::connect(&url, 5).await.unwrap();
        db.migrate().await.unwrap();
        let schema = build_schema(db.clone(), &SchemaLimits::default());
        Self {
            _dir: dir,
            db,
            schema,
        }
    }

    async fn run(&self, request: impl Into<Request>) -> (Response, Arc<RequestContext>) {
        let ctx = Arc::new(RequestContext::new());
        let response = self.schema.execute(request.into().data(ctx.clone())).await;
        (response, ctx)
    }

    /// Execute and return `(data, errors)` as JSON
    async fn query(&self, query: &str) -> (Value, Vec<Value>) {
        let (response, _) = self.run(query).await;
        split(response)
    }

    async fn user(&self, name: &str) -> String {
        self.db
            .users()
            .create(CreateUser {
                name: name.to_string(),
                balance: 100.0,
            })
            .await
            .unwrap()
            .id
    }

    async fn subscribe(&self, subscriber: &str, author: &str) {
        self.db.subscriptions().create(subscriber, author).await.unwrap();
    }
}

fn split(response: Response) -> (Value, Vec<Value>) {
    let json = serde_json::to_value(&response).unwrap();
    let data = json.get("data").cloned().unwrap_or(Value::Null);
    let errors = json
        .get("errors")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    (data, errors)
}

fn codes(errors: &[Value]) -> Vec<&str> {
    errors
        .iter()
        .filter_map(|e| e.pointer("/extensions/code").and_then(Value::as_str))
        .collect()
}

fn messages(errors: &[Value]) -> Vec<&str> {
    errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect()
}

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Batched users list
// ============================================================================

mod batched_users {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_identical_selections_share_one_fetch() {
        let app = TestApp::new().await;
        app.user("alice").await;

        let (response, ctx) = app
            .run("{ a: users { id name } b: users { id name } }")
            .await;
        let (data, errors) = split(response);

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["a"], data["b"]);
        assert_eq!(ctx.fetches_issued(), 1);
    }

    #[tokio::test]
    async fn test_reordered_fields_share_one_fetch() {
        let app = TestApp::new().await;
        app.user("alice").await;

        let (_, ctx) = app
            .run("{ a: users { id name } b: users { name id } }")
            .await;

        assert_eq!(ctx.fetches_issued(), 1);
    }

    #[tokio::test]
    async fn test_different_selections_fetch_independently() {
        let app = TestApp::new().await;
        app.user("alice").await;

        let (response, ctx) = app
            .run("{ a: users { id } b: users { id subscribedToUser { id } } }")
            .await;
        let (_, errors) = split(response);

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(ctx.fetches_issued(), 2);
    }

    #[tokio::test]
    async fn test_sibling_fragments_fetch_once() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        app.subscribe(&alice, &bob).await;

        let query = r#"
            query {
                ...First
                ...Second
            }
            fragment First on Query {
                users { id name subscribedToUser { id } }
            }
            fragment Second on Query {
                users { id name subscribedToUser { id } }
            }
        "#;
        let (response, ctx) = app.run(query).await;
        let (data, errors) = split(response);

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(ctx.fetches_issued(), 1);
        assert_eq!(
            data["users"][1]["subscribedToUser"],
            json!([{ "id": alice }])
        );
    }

    #[tokio::test]
    async fn test_each_request_gets_a_fresh_cache() {
        let app = TestApp::new().await;
        app.user("alice").await;

        let (_, first) = app.run("{ users { id } }").await;
        app.user("bob").await;
        let (response, second) = app.run("{ users { name } }").await;
        let (data, _) = split(response);

        assert_eq!(first.fetches_issued(), 1);
        assert_eq!(second.fetches_issued(), 1);
        assert_eq!(names(&data["users"]), vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_users_without_request_context_fail() {
        let app = TestApp::new().await;

        let response = app.schema.execute("{ users { id } }").await;
        let (_, errors) = split(response);

        assert_eq!(codes(&errors), vec!["INTERNAL_SERVER_ERROR"]);
    }
}

// ============================================================================
// Relations
// ============================================================================

mod relations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_subscription_lists_from_preloaded_edges() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        let carol = app.user("carol").await;
        app.subscribe(&alice, &bob).await;
        app.subscribe(&carol, &bob).await;
        app.subscribe(&bob, &carol).await;

        let (response, ctx) = app
            .run("{ users { name subscribedToUser { name } userSubscribedTo { name } } }")
            .await;
        let (data, errors) = split(response);

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(ctx.fetches_issued(), 1);

        let users = data["users"].as_array().unwrap();
        assert_eq!(names(&users[0]["userSubscribedTo"]), vec!["bob"]);
        assert_eq!(names(&users[1]["subscribedToUser"]), vec!["alice", "carol"]);
        assert_eq!(names(&users[1]["userSubscribedTo"]), vec!["carol"]);
        assert_eq!(names(&users[2]["subscribedToUser"]), vec!["bob"]);
        assert!(users[0]["subscribedToUser"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_lists_through_loaders() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        let carol = app.user("carol").await;
        app.subscribe(&alice, &bob).await;
        app.subscribe(&carol, &bob).await;

        let query = format!(
            r#"{{ user(id: "{bob}") {{ name subscribedToUser {{ name userSubscribedTo {{ name }} }} }} }}"#
        );
        let (response, ctx) = app.run(query.as_str()).await;
        let (data, errors) = split(response);

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(ctx.fetches_issued(), 0);
        let subscribers = &data["user"]["subscribedToUser"];
        assert_eq!(names(subscribers), vec!["alice", "carol"]);
        assert_eq!(names(&subscribers[0]["userSubscribedTo"]), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_profile_and_member_type() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;
        app.db
            .profiles()
            .create(CreateProfile {
                is_male: false,
                year_of_birth: 1990,
                user_id: alice.clone(),
                member_type_id: "business".to_string(),
            })
            .await
            .unwrap();

        let (data, errors) = app
            .query(
                "{ users { profile { isMale yearOfBirth memberTypeId memberType { id discount postsLimitPerMonth } user { name } } } }",
            )
            .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data["users"][0]["profile"],
            json!({
                "isMale": false,
                "yearOfBirth": 1990,
                "memberTypeId": "business",
                "memberType": { "id": "business", "discount": 7.7, "postsLimitPerMonth": 100 },
                "user": { "name": "alice" }
            })
        );

        let (data, _) = app
            .query(r#"{ memberType(id: "business") { profiles { userId } } }"#)
            .await;
        assert_eq!(
            data["memberType"]["profiles"],
            json!([{ "userId": alice }])
        );
    }

    #[tokio::test]
    async fn test_posts_and_authors() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;
        let post = app
            .db
            .posts()
            .create(CreatePost {
                title: "Hello".to_string(),
                content: "World".to_string(),
                author_id: alice.clone(),
            })
            .await
            .unwrap();

        let (data, errors) = app
            .query("{ posts { title authorId author { name posts { content } } } }")
            .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data["posts"],
            json!([{
                "title": "Hello",
                "authorId": alice,
                "author": { "name": "alice", "posts": [{ "content": "World" }] }
            }])
        );

        let (data, _) = app
            .query(&format!(r#"{{ post(id: "{}") {{ id }} }}"#, post.id))
            .await;
        assert_eq!(data["post"]["id"], json!(post.id));
    }
}

// ============================================================================
// Scalars at the API boundary
// ============================================================================

mod scalars {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_unknown_member_type_is_a_field_error() {
        let app = TestApp::new().await;

        let (data, errors) = app
            .query(r#"{ memberType(id: "gold") { id } memberTypes { id discount postsLimitPerMonth } }"#)
            .await;

        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("Invalid MemberTypeId."));
        assert_eq!(data["memberType"], Value::Null);
        assert_eq!(
            data["memberTypes"],
            json!([
                { "id": "basic", "discount": 2.3, "postsLimitPerMonth": 20 },
                { "id": "business", "discount": 7.7, "postsLimitPerMonth": 100 }
            ])
        );
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_rejected() {
        let app = TestApp::new().await;

        let (data, errors) = app.query(r#"{ user(id: "not-a-uuid") { id } posts { id } }"#).await;

        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("Invalid UUID."));
        assert_eq!(data["user"], Value::Null);
        assert_eq!(data["posts"], json!([]));
    }

    #[tokio::test]
    async fn test_malformed_uuid_variable_is_rejected() {
        let app = TestApp::new().await;

        let request = Request::new("query Get($id: UUID!) { profile(id: $id) { id } }")
            .variables(Variables::from_json(json!({ "id": "ABC" })));
        let (response, _) = app.run(request).await;
        let (_, errors) = split(response);

        assert!(!errors.is_empty());
        assert!(messages(&errors)[0].contains("Invalid UUID."));
    }

    #[tokio::test]
    async fn test_well_formed_unknown_id_is_null() {
        let app = TestApp::new().await;

        let (data, errors) = app
            .query(&format!(r#"{{ user(id: "{MISSING_ID}") {{ id }} profile(id: "{MISSING_ID}") {{ id }} }}"#))
            .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data, json!({ "user": null, "profile": null }));
    }
}

// ============================================================================
// Mutations
// ============================================================================

mod mutations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_delete_missing_post_is_upstream_error() {
        let app = TestApp::new().await;

        let (_, errors) = app
            .query(&format!(r#"mutation {{ deletePost(id: "{MISSING_ID}") }}"#))
            .await;

        assert_eq!(codes(&errors), vec!["UPSTREAM_ERROR"]);
        assert!(!messages(&errors)[0].contains("Invalid UUID."));
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let app = TestApp::new().await;

        let (data, errors) = app
            .query(r#"mutation { createUser(dto: { name: "alice", balance: 10.5 }) { id name balance } }"#)
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        let id = data["createUser"]["id"].as_str().unwrap().to_string();
        assert_eq!(data["createUser"]["balance"], json!(10.5));

        let (data, errors) = app
            .query(&format!(
                r#"mutation {{ changeUser(id: "{id}", dto: {{ name: "alicia" }}) {{ name balance }} }}"#
            ))
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["changeUser"], json!({ "name": "alicia", "balance": 10.5 }));

        let (data, errors) = app
            .query(&format!(r#"mutation {{ deleteUser(id: "{id}") }}"#))
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["deleteUser"], json!(true));

        let (data, _) = app.query(&format!(r#"{{ user(id: "{id}") {{ id }} }}"#)).await;
        assert_eq!(data["user"], Value::Null);
    }

    #[tokio::test]
    async fn test_post_and_profile_mutations() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;

        let (data, errors) = app
            .query(&format!(
                r#"mutation {{
                    createPost(dto: {{ title: "t", content: "c", authorId: "{alice}" }}) {{ id }}
                    createProfile(dto: {{ isMale: true, yearOfBirth: 1980, userId: "{alice}", memberTypeId: "basic" }}) {{ id }}
                }}"#
            ))
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        let post_id = data["createPost"]["id"].as_str().unwrap().to_string();
        let profile_id = data["createProfile"]["id"].as_str().unwrap().to_string();

        let (data, errors) = app
            .query(&format!(
                r#"mutation {{
                    changePost(id: "{post_id}", dto: {{ title: "new" }}) {{ title content }}
                    changeProfile(id: "{profile_id}", dto: {{ memberTypeId: "business" }}) {{ isMale memberTypeId }}
                }}"#
            ))
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["changePost"], json!({ "title": "new", "content": "c" }));
        assert_eq!(
            data["changeProfile"],
            json!({ "isMale": true, "memberTypeId": "business" })
        );

        let (data, errors) = app
            .query(&format!(
                r#"mutation {{ deletePost(id: "{post_id}") deleteProfile(id: "{profile_id}") }}"#
            ))
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data, json!({ "deletePost": true, "deleteProfile": true }));
    }

    #[tokio::test]
    async fn test_invalid_member_type_in_input() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;

        let (_, errors) = app
            .query(&format!(
                r#"mutation {{ createProfile(dto: {{ isMale: true, yearOfBirth: 1980, userId: "{alice}", memberTypeId: "gold" }}) {{ id }} }}"#
            ))
            .await;

        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("Invalid MemberTypeId."));
        assert!(app.db.profiles().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_for_unknown_author_is_upstream_error() {
        let app = TestApp::new().await;

        let (_, errors) = app
            .query(&format!(
                r#"mutation {{ createPost(dto: {{ title: "t", content: "c", authorId: "{MISSING_ID}" }}) {{ id }} }}"#
            ))
            .await;

        assert_eq!(codes(&errors), vec!["UPSTREAM_ERROR"]);
    }

    #[tokio::test]
    async fn test_subscribe_and_unsubscribe() {
        let app = TestApp::new().await;
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;

        let (data, errors) = app
            .query(&format!(
                r#"mutation {{ subscribeTo(userId: "{alice}", authorId: "{bob}") {{ name userSubscribedTo {{ name }} }} }}"#
            ))
            .await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            data["subscribeTo"],
            json!({ "name": "alice", "userSubscribedTo": [{ "name": "bob" }] })
        );

        let unsubscribe = format!(r#"mutation {{ unsubscribeFrom(userId: "{alice}", authorId: "{bob}") }}"#);
        let (data, errors) = app.query(&unsubscribe).await;
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["unsubscribeFrom"], json!(true));

        let (_, errors) = app.query(&unsubscribe).await;
        assert_eq!(codes(&errors), vec!["UPSTREAM_ERROR"]);
    }
}
