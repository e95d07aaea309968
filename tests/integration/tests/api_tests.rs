//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, MASTER_KEY
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error_code, assert_json, assert_status, check_test_env, fixtures::*, test_master_key,
    TestServer,
};
use reqwest::StatusCode;

/// Register a user and log them in, returning the registration data and the
/// session key.
async fn register_and_login(server: &TestServer) -> (RegisterRequest, String) {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/users", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/api/v1/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: LoginResponse = assert_json(response, StatusCode::OK).await.unwrap();

    (request, login.key)
}

/// Credit an account through the admin endpoint.
async fn credit(server: &TestServer, username: &str, amount: i64) {
    let response = server
        .post(
            "/api/v1/users/update-balance",
            &AdjustRequest {
                master_key: test_master_key(),
                username: username.to_string(),
                amount,
                action: "credit".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

/// Read an account's balance through the admin endpoint.
async fn view_balance(server: &TestServer, username: &str) -> i64 {
    let response = server
        .post(
            "/api/v1/users/view-balance",
            &ViewBalanceRequest {
                master_key: test_master_key(),
                username: username.to_string(),
            },
        )
        .await
        .unwrap();
    let balance: BalanceResponse = assert_json(response, StatusCode::OK).await.unwrap();
    balance.balance
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Registration and Login Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/v1/users", &request).await.unwrap();
    let registered: RegisterResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(registered.user.username, request.username);
    assert_eq!(registered.user.phone_number, request.phone_number);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/api/v1/users", &request).await.unwrap();

    // Same username, fresh phone number. Duplicates answer 400, not 409.
    let mut duplicate = request.clone();
    duplicate.phone_number = RegisterRequest::unique().phone_number;
    let response = server.post("/api/v1/users", &duplicate).await.unwrap();
    assert_error_code(response, StatusCode::BAD_REQUEST, "USERNAME_TAKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_registrations_sharing_a_phone_number() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let first = RegisterRequest::unique();
    let mut second = RegisterRequest::unique();
    second.phone_number = first.phone_number.clone();

    // Both pre-checks can pass before either insert lands; the loser must
    // still come back as a phone conflict, not a username one.
    let (a, b) = tokio::join!(
        server.post("/api/v1/users", &first),
        server.post("/api/v1/users", &second),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    let (winner, loser) = if a.status() == StatusCode::CREATED {
        (a, b)
    } else {
        (b, a)
    };

    assert_status(winner, StatusCode::CREATED).await.unwrap();
    assert_error_code(loser, StatusCode::BAD_REQUEST, "PHONE_NUMBER_TAKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_rejects_invalid_fields() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let mut short_username = RegisterRequest::unique();
    short_username.username = "abc".to_string();
    let response = server.post("/api/v1/users", &short_username).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let mut bad_phone = RegisterRequest::unique();
    bad_phone.phone_number = "not-digits".to_string();
    let response = server.post("/api/v1/users", &bad_phone).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/api/v1/users", &request).await.unwrap();

    let response = server
        .post(
            "/api/v1/login",
            &LoginRequest {
                username: request.username.clone(),
                password: "wrong-password".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_login_twice_returns_same_key() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/api/v1/users", &request).await.unwrap();

    let login = LoginRequest::from_register(&request);
    let first: LoginResponse = assert_json(
        server.post("/api/v1/login", &login).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let second: LoginResponse = assert_json(
        server.post("/api/v1/login", &login).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_eq!(first.key, second.key);
}

// ============================================================================
// Balance and Transfer Tests
// ============================================================================

#[tokio::test]
async fn test_admin_credit_then_view_own_balance() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, key) = register_and_login(&server).await;

    credit(&server, &request.username, 250).await;

    let response = server
        .post("/api/v1/users/balance", &KeyRequest { key })
        .await
        .unwrap();
    let balance: BalanceResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(balance.balance, 250);
    assert_eq!(balance.grade, "unassigned");
}

#[tokio::test]
async fn test_adjust_rejects_wrong_master_key() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register_and_login(&server).await;

    let response = server
        .post(
            "/api/v1/users/update-balance",
            &AdjustRequest {
                master_key: "definitely-wrong".to_string(),
                username: request.username.clone(),
                amount: 100,
                action: "credit".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_transfer_flow_with_audit_messages() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (sender, sender_key) = register_and_login(&server).await;
    let (recipient, recipient_key) = register_and_login(&server).await;

    credit(&server, &sender.username, 100).await;

    let response = server
        .post(
            "/api/v1/users/transfer-balance",
            &TransferRequest {
                sender_key: sender_key.clone(),
                recipient_username: recipient.username.clone(),
                amount: 30,
            },
        )
        .await
        .unwrap();
    let transfer: TransferResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(transfer.sender_balance, 70);
    assert_eq!(transfer.recipient_balance, 30);

    // Both parties got an audit message.
    let response = server
        .post("/api/v1/users/messages", &KeyRequest { key: sender_key })
        .await
        .unwrap();
    let messages: MessagesResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        messages.messages[0].content,
        format!("You sent 30 to {}.", recipient.username)
    );

    let response = server
        .post(
            "/api/v1/users/messages",
            &KeyRequest { key: recipient_key },
        )
        .await
        .unwrap();
    let messages: MessagesResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        messages.messages[0].content,
        format!("You received 30 from {}.", sender.username)
    );
}

#[tokio::test]
async fn test_transfer_insufficient_funds() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (sender, sender_key) = register_and_login(&server).await;
    let (recipient, _) = register_and_login(&server).await;

    credit(&server, &sender.username, 5).await;

    let response = server
        .post(
            "/api/v1/users/transfer-balance",
            &TransferRequest {
                sender_key,
                recipient_username: recipient.username.clone(),
                amount: 10,
            },
        )
        .await
        .unwrap();
    assert_error_code(response, StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS")
        .await
        .unwrap();

    // The failed transfer touched neither side.
    assert_eq!(view_balance(&server, &sender.username).await, 5);
    assert_eq!(view_balance(&server, &recipient.username).await, 0);
}

#[tokio::test]
async fn test_concurrent_transfers_never_overdraw() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (sender, sender_key) = register_and_login(&server).await;
    let (first, _) = register_and_login(&server).await;
    let (second, _) = register_and_login(&server).await;

    credit(&server, &sender.username, 100).await;

    // Two in-flight debits whose sum exceeds the balance. The row lock
    // serializes them and the funds re-check under the lock fails the loser.
    let first_request = TransferRequest {
        sender_key: sender_key.clone(),
        recipient_username: first.username.clone(),
        amount: 70,
    };
    let second_request = TransferRequest {
        sender_key,
        recipient_username: second.username.clone(),
        amount: 70,
    };
    let (a, b) = tokio::join!(
        server.post("/api/v1/users/transfer-balance", &first_request),
        server.post("/api/v1/users/transfer-balance", &second_request),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    let (winner, loser) = if a.status() == StatusCode::OK {
        (a, b)
    } else {
        (b, a)
    };

    let won: TransferResponse = assert_json(winner, StatusCode::OK).await.unwrap();
    assert_eq!(won.sender_balance, 30);
    assert_error_code(loser, StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS")
        .await
        .unwrap();

    // Value was conserved: one 70 moved, nothing was minted or lost.
    let sender_balance = view_balance(&server, &sender.username).await;
    let first_balance = view_balance(&server, &first.username).await;
    let second_balance = view_balance(&server, &second.username).await;
    assert_eq!(sender_balance, 30);
    assert_eq!(first_balance + second_balance, 70);
}

#[tokio::test]
async fn test_transfer_to_self_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (sender, sender_key) = register_and_login(&server).await;

    credit(&server, &sender.username, 100).await;

    let response = server
        .post(
            "/api/v1/users/transfer-balance",
            &TransferRequest {
                sender_key,
                recipient_username: sender.username,
                amount: 10,
            },
        )
        .await
        .unwrap();
    assert_error_code(response, StatusCode::BAD_REQUEST, "SELF_TRANSFER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_transfer_requires_valid_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (recipient, _) = register_and_login(&server).await;

    let response = server
        .post(
            "/api/v1/users/transfer-balance",
            &TransferRequest {
                sender_key: "not-a-session-key-at-all-000000".to_string(),
                recipient_username: recipient.username,
                amount: 10,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_admin_view_balance_and_grade() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register_and_login(&server).await;

    credit(&server, &request.username, 42).await;

    let response = server
        .post(
            "/api/v1/users/update-grade",
            &SetGradeRequest {
                master_key: test_master_key(),
                username: request.username.clone(),
                grade: "gold".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(
            "/api/v1/users/view-balance",
            &ViewBalanceRequest {
                master_key: test_master_key(),
                username: request.username.clone(),
            },
        )
        .await
        .unwrap();
    let balance: BalanceResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(balance.balance, 42);
    assert_eq!(balance.grade, "gold");
}

// ============================================================================
// Profile and Password Tests
// ============================================================================

#[tokio::test]
async fn test_profile_via_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, key) = register_and_login(&server).await;

    let response = server
        .post("/api/v1/user-data", &KeyRequest { key })
        .await
        .unwrap();
    let profile: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.username, request.username);
    assert_eq!(profile.display_name, request.display_name);
}

#[tokio::test]
async fn test_update_password_then_login_with_new_one() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register_and_login(&server).await;

    let response = server
        .post(
            "/api/v1/users/update-password",
            &UpdatePasswordRequest {
                username: request.username.clone(),
                current_password: request.password.clone(),
                new_password: "FreshPass456".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(
            "/api/v1/login",
            &LoginRequest {
                username: request.username.clone(),
                password: "FreshPass456".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_list_users_omits_password_material() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register_and_login(&server).await;

    let response = server.get("/api/v1/users").await.unwrap();
    let users: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    let listed = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == request.username.as_str())
        .expect("registered user should be listed");
    assert!(listed.get("password").is_none());
    assert!(listed.get("passwordHash").is_none());
}
