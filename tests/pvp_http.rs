mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_app;
use common::auth::{auth_header, register_and_get_token};
use common::http::{assert_status_ok_json, request, response_json};
use word_warrior_backend::engine::{RankTier, StatSheet};

async fn post_result(
    app: &common::app::TestApp,
    token: &str,
    opponent_rank: &str,
    result: &str,
) -> (StatusCode, serde_json::Value) {
    let response = request(
        &app.app,
        Method::POST,
        "/api/pvp/result",
        Some(serde_json::json!({
            "opponentRank": opponent_rank,
            "result": result,
        })),
        &[("authorization", auth_header(token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    (status, body)
}

#[tokio::test]
async fn it_pvp_bronze_upset_win_over_gold() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    // 青铜 0 分战胜黄金：基础 30 分 × 1.5 = 45，留在青铜，外加突破奖励
    let (status, body) = post_result(&app, &token, "Gold", "win").await;

    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["upsetWin"], true);
    let sheet = &body["data"]["statSheet"];
    assert_eq!(sheet["rankPoints"], 45);
    assert_eq!(sheet["rank"], "Bronze");
    assert_eq!(sheet["winStreak"], 1);
    assert_eq!(sheet["atk"], 11);
    assert!((sheet["crit"].as_f64().unwrap() - 0.07).abs() < 1e-9);
    assert_eq!(sheet["exp"], 50);
}

#[tokio::test]
async fn it_pvp_gold_loss_to_bronze_demotes_one_tier() {
    let app = spawn_test_app().await;
    let (token, user_id) = register_and_get_token(&app).await;

    let gold_floor_sheet = StatSheet {
        rank_points: 250,
        rank: RankTier::Gold,
        win_streak: 4,
        ..StatSheet::default()
    };
    app.state
        .store()
        .put_stat_sheet(&user_id, &gold_floor_sheet)
        .unwrap();

    // 黄金保级线输给青铜：扣 18 分跌入白银，连胜清零
    let (status, body) = post_result(&app, &token, "Bronze", "loss").await;

    assert_status_ok_json(status, &body);
    let sheet = &body["data"]["statSheet"];
    assert_eq!(sheet["rankPoints"], 232);
    assert_eq!(sheet["rank"], "Silver");
    assert_eq!(sheet["winStreak"], 0);
    // 败场不碰经验和属性
    assert_eq!(sheet["exp"], 0);
    assert_eq!(sheet["atk"], 10);
}

#[tokio::test]
async fn it_pvp_equal_rank_win_is_not_upset() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    let (status, body) = post_result(&app, &token, "Bronze", "win").await;

    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["upsetWin"], false);
    let sheet = &body["data"]["statSheet"];
    assert_eq!(sheet["rankPoints"], 20);
    assert_eq!(sheet["atk"], 10);
    assert_eq!(sheet["crit"], 0.05);
}

#[tokio::test]
async fn it_pvp_streak_bonus_kicks_in_at_five() {
    let app = spawn_test_app().await;
    let (token, user_id) = register_and_get_token(&app).await;

    let sheet = StatSheet {
        win_streak: 4,
        ..StatSheet::default()
    };
    app.state.store().put_stat_sheet(&user_id, &sheet).unwrap();

    // 第 5 连胜：同段位 20 分 + 连胜奖励 5 分
    let (status, body) = post_result(&app, &token, "Bronze", "win").await;

    assert_status_ok_json(status, &body);
    let sheet = &body["data"]["statSheet"];
    assert_eq!(sheet["winStreak"], 5);
    assert_eq!(sheet["rankPoints"], 25);
}

#[tokio::test]
async fn it_pvp_bronze_loss_floors_at_zero() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    let (status, body) = post_result(&app, &token, "Bronze", "loss").await;

    assert_status_ok_json(status, &body);
    let sheet = &body["data"]["statSheet"];
    assert_eq!(sheet["rankPoints"], 0);
    assert_eq!(sheet["rank"], "Bronze");
}

#[tokio::test]
async fn it_pvp_invalid_rank_value_rejected() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    let (status, _) = post_result(&app, &token, "Platinum", "win").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn it_pvp_history_is_newest_first() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    let (_, _) = post_result(&app, &token, "Bronze", "win").await;
    // 键内时间戳精确到毫秒，隔开两场避免同毫秒落键
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (_, _) = post_result(&app, &token, "Silver", "loss").await;

    let response = request(
        &app.app,
        Method::GET,
        "/api/pvp/history",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;

    assert_status_ok_json(status, &body);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["result"], "loss");
    assert_eq!(records[0]["opponentRank"], "Silver");
    assert_eq!(records[1]["result"], "win");
    assert!(records[0]["combatPowerAfter"].as_f64().is_some());
}

#[tokio::test]
async fn it_pvp_history_respects_limit() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    for _ in 0..3 {
        let (_, _) = post_result(&app, &token, "Bronze", "win").await;
    }

    let response = request(
        &app.app,
        Method::GET,
        "/api/pvp/history?limit=2",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;

    assert_status_ok_json(status, &body);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
