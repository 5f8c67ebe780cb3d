#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::store::{AccountForm, NON_FIELD_ERRORS};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn server() -> TestServer {
        TestServer::new(setup_test_app().await).unwrap()
    }

    async fn create_account(server: &TestServer, user_name: &str, hoge_id: i32) -> i64 {
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "userName": user_name, "hogeId": hoge_id }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_user(server: &TestServer, user_name: &str, account_id: i64) -> i64 {
        let response = server
            .post("/api/v1/users")
            .json(&json!({ "userName": user_name, "hogeId": 0, "accountId": account_id }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_create_account() {
        let server = server().await;

        let response = server
            .post("/api/v1/accounts")
            .json(&AccountForm {
                user_name: "taro".to_string(),
                hoge_id: 42,
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Account created successfully");
        assert_eq!(body.data["userName"], "taro");
        assert_eq!(body.data["hogeId"], 42);
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_account_name_at_limit_is_accepted() {
        let server = server().await;

        let name = "a".repeat(20);
        let id = create_account(&server, &name, 1).await;

        let response = server.get(&format!("/api/v1/accounts/{}", id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["userName"], name);
    }

    #[tokio::test]
    async fn test_create_account_with_long_name_is_rejected() {
        let server = server().await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "userName": "a".repeat(21), "hogeId": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "VALIDATION_ERROR");
        let fields = body.fields.unwrap();
        assert_eq!(
            fields["userName"],
            vec!["Ensure this value has at most 20 characters (it has 21).".to_string()]
        );

        let list: ApiResponse<Vec<Value>> = server.get("/api/v1/accounts").await.json();
        assert!(list.data.is_empty());
    }

    #[tokio::test]
    async fn test_account_name_is_trimmed_before_length_check() {
        let server = server().await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "userName": format!("  {}  ", "a".repeat(20)), "hogeId": 1 }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["userName"], "a".repeat(20));
    }

    #[tokio::test]
    async fn test_create_account_with_blank_name_is_rejected() {
        let server = server().await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "userName": "", "hogeId": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(body.fields.unwrap().contains_key("userName"));
    }

    #[tokio::test]
    async fn test_create_account_with_non_integer_hoge_id_is_rejected() {
        let server = server().await;

        for hoge_id in [json!("abc"), json!(1.5)] {
            let response = server
                .post("/api/v1/accounts")
                .json(&json!({ "userName": "taro", "hogeId": hoge_id }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = response.json();
            assert_eq!(body.code, "VALIDATION_ERROR");
            assert!(body.fields.unwrap().contains_key(NON_FIELD_ERRORS));
        }
    }

    #[tokio::test]
    async fn test_get_accounts_in_insertion_order() {
        let server = server().await;
        create_account(&server, "first", 1).await;
        create_account(&server, "second", 2).await;

        let response = server.get("/api/v1/accounts").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.message, "Accounts retrieved successfully");
        let names: Vec<_> = body.data.iter().map(|a| a["userName"].clone()).collect();
        assert_eq!(names, vec![json!("first"), json!("second")]);
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let server = server().await;

        let response = server.get("/api/v1/accounts/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.error, "Account with ID 999 not found");
    }

    #[tokio::test]
    async fn test_update_account() {
        let server = server().await;
        let id = create_account(&server, "before", 1).await;

        let response = server
            .put(&format!("/api/v1/accounts/{}", id))
            .json(&json!({ "userName": "after" }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "Account updated successfully");
        assert_eq!(body.data["userName"], "after");
        assert_eq!(body.data["hogeId"], 1);
    }

    #[tokio::test]
    async fn test_update_account_with_long_name_keeps_record() {
        let server = server().await;
        let id = create_account(&server, "keep", 1).await;

        let response = server
            .put(&format!("/api/v1/accounts/{}", id))
            .json(&json!({ "userName": "b".repeat(21) }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let stored: ApiResponse<Value> = server.get(&format!("/api/v1/accounts/{}", id)).await.json();
        assert_eq!(stored.data["userName"], "keep");
    }

    #[tokio::test]
    async fn test_update_account_not_found() {
        let server = server().await;

        let response = server
            .put("/api/v1/accounts/999")
            .json(&json!({ "hogeId": 5 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_account_cascades_to_user() {
        let server = server().await;
        let account_id = create_account(&server, "owner", 1).await;
        let user_id = create_user(&server, "member", account_id).await;

        let response = server.delete(&format!("/api/v1/accounts/{}", account_id)).await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<String> = response.json();
        assert_eq!(body.message, "Account deleted successfully");
        assert_eq!(body.data, "Account owner deleted with 1 linked user(s)");

        server
            .get(&format!("/api/v1/accounts/{}", account_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get(&format!("/api/v1/users/{}", user_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_account_not_found() {
        let server = server().await;

        server
            .delete("/api/v1/accounts/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = server().await;
        let account_id = create_account(&server, "owner", 1).await;

        let response = server
            .post("/api/v1/users")
            .json(&json!({ "userName": "member", "hogeId": 9, "accountId": account_id }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data["accountId"], account_id);
        assert_eq!(body.data["hogeId"], 9);
    }

    #[tokio::test]
    async fn test_second_user_for_same_account_is_rejected() {
        let server = server().await;
        let account_id = create_account(&server, "owner", 1).await;
        create_user(&server, "first", account_id).await;

        let response = server
            .post("/api/v1/users")
            .json(&json!({ "userName": "second", "hogeId": 0, "accountId": account_id }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(body.fields.unwrap().contains_key("accountId"));

        let users: ApiResponse<Vec<Value>> = server.get("/api/v1/users").await.json();
        assert_eq!(users.data.len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_for_missing_account() {
        let server = server().await;

        let response = server
            .post("/api/v1/users")
            .json(&json!({ "userName": "orphan", "hogeId": 0, "accountId": 404 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Account with ID 404 not found");
    }

    #[tokio::test]
    async fn test_move_user_to_free_account() {
        let server = server().await;
        let first = create_account(&server, "first", 1).await;
        let second = create_account(&server, "second", 2).await;
        let user_id = create_user(&server, "member", first).await;

        let response = server
            .put(&format!("/api/v1/users/{}", user_id))
            .json(&json!({ "accountId": second }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["accountId"], second);

        // The first account is free again
        create_user(&server, "newcomer", first).await;
    }

    #[tokio::test]
    async fn test_delete_user_keeps_account() {
        let server = server().await;
        let account_id = create_account(&server, "owner", 1).await;
        let user_id = create_user(&server, "member", account_id).await;

        let response = server.delete(&format!("/api/v1/users/{}", user_id)).await;

        response.assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/accounts/{}", account_id))
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_index_lists_registered_models() {
        let server = server().await;
        create_account(&server, "owner", 1).await;

        let response = server.get("/admin").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        let models = body.data["models"].as_array().unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0]["name"], "accounts");
        assert_eq!(models[0]["changelistUrl"], "/admin/accounts");
        assert_eq!(models[0]["apiUrl"], "/api/v1/accounts");
        assert_eq!(models[0]["count"], 1);
        assert_eq!(models[1]["name"], "users");
        assert_eq!(models[1]["count"], 0);
    }

    #[tokio::test]
    async fn test_account_changelist_shows_two_columns() {
        let server = server().await;
        create_account(&server, "taro", 7).await;

        let response = server.get("/admin/accounts").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        let table = &body.data;
        assert_eq!(
            table["columns"],
            json!([
                { "field": "userName", "label": "UserName" },
                { "field": "hogeId", "label": "hoge id" }
            ])
        );
        assert_eq!(table["rows"][0]["label"], "taro");
        assert_eq!(table["rows"][0]["cells"], json!(["taro", 7]));
        assert_eq!(table["total"], 1);
    }

    #[tokio::test]
    async fn test_account_changelist_paginates() {
        let server = server().await;
        for i in 0..3 {
            create_account(&server, &format!("name{}", i), i).await;
        }

        let response = server.get("/admin/accounts?page=2&limit=2").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["perPage"], 2);
        assert_eq!(body.data["total"], 3);
        let rows = body.data["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["label"], "name2");
    }

    #[tokio::test]
    async fn test_changelist_rejects_zero_page() {
        let server = server().await;

        let response = server.get("/admin/accounts?page=0").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "VALIDATION_ERROR");
        let fields = body.fields.unwrap();
        assert!(fields.contains_key("page"));
        assert!(!fields.contains_key("limit"));
    }

    #[tokio::test]
    async fn test_changelist_rejects_oversized_limit() {
        let server = server().await;

        let response = server.get("/admin/users?limit=5000").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(body.fields.unwrap().contains_key("limit"));
    }

    #[tokio::test]
    async fn test_changelist_rejects_non_numeric_page() {
        let server = server().await;

        let response = server.get("/admin/accounts?page=abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(body.fields.unwrap().contains_key(NON_FIELD_ERRORS));
    }

    #[tokio::test]
    async fn test_user_changelist_shows_account_label() {
        let server = server().await;
        let account_id = create_account(&server, "owner", 1).await;
        create_user(&server, "member", account_id).await;

        let response = server.get("/admin/users").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["columns"][2]["field"], "account");
        assert_eq!(body.data["rows"][0]["cells"], json!(["member", 0, "owner"]));
    }
}
