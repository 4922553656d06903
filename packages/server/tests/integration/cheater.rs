use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::json;

use wall_server::entity::{cheater, evidence};

use crate::common::{TestApp, cheater_payload, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn first_cheater_gets_id_one() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::CHEATERS, &cheater_payload(None, "evidence_1"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "Cheater added successfully");
        assert_eq!(res.body["cheater"]["id"], 1);
        assert_eq!(res.body["cheater"]["evidence"], "evidence_1");
        assert_eq!(res.body["cheater"]["isPermanent"], true);
        assert_eq!(res.body["evidence"]["id"], "evidence_1");
    }

    #[tokio::test]
    async fn omitted_id_is_one_more_than_the_maximum() {
        let app = TestApp::spawn().await;
        app.create_cheater(Some(7), "evidence_7").await;
        app.create_cheater(Some(3), "evidence_3").await;

        let id = app.create_cheater(None, "evidence_next").await;

        assert_eq!(id, 8);
    }

    #[tokio::test]
    async fn numeric_string_id_is_accepted() {
        let app = TestApp::spawn().await;
        let mut body = cheater_payload(None, "evidence_5");
        body["cheater"]["id"] = json!("5");

        let res = app.post(routes::CHEATERS, &body).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["cheater"]["id"], 5);
    }

    #[tokio::test]
    async fn codeforces_id_defaults_to_placeholder() {
        let app = TestApp::spawn().await;
        let mut body = cheater_payload(None, "evidence_1");
        body["cheater"]
            .as_object_mut()
            .unwrap()
            .remove("codeforcesId");

        let res = app.post(routes::CHEATERS, &body).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["cheater"]["codeforcesId"], "-");
    }

    #[tokio::test]
    async fn evidence_reference_defaults_to_evidence_id() {
        let app = TestApp::spawn().await;
        let mut body = cheater_payload(None, "evidence_1");
        body["cheater"].as_object_mut().unwrap().remove("evidence");

        let res = app.post(routes::CHEATERS, &body).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["cheater"]["evidence"], "evidence_1");
    }

    #[tokio::test]
    async fn missing_evidence_object_is_bad_request() {
        let app = TestApp::spawn().await;
        let body = json!({"cheater": cheater_payload(None, "e")["cheater"].clone()});

        let res = app.post(routes::CHEATERS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn missing_required_field_is_validation_error() {
        let app = TestApp::spawn().await;
        let mut body = cheater_payload(None, "evidence_1");
        body["cheater"].as_object_mut().unwrap().remove("name");

        let res = app.post(routes::CHEATERS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "VALIDATION_ERROR");
        assert_eq!(evidence::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_date_is_validation_error() {
        let app = TestApp::spawn().await;
        let mut body = cheater_payload(None, "evidence_1");
        body["cheater"]["date"] = json!("14/03/2025");

        let res = app.post(routes::CHEATERS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn duplicate_cheater_id_conflicts_without_orphaning_evidence() {
        let app = TestApp::spawn().await;
        app.create_cheater(Some(1), "evidence_1").await;

        let res = app
            .post(routes::CHEATERS, &cheater_payload(Some(1), "evidence_other"))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["error"], "DUPLICATE_ERROR");
        assert_eq!(cheater::Entity::find().count(&app.db).await.unwrap(), 1);
        // The evidence written earlier in the same request was rolled back.
        let orphan = evidence::Entity::find_by_id("evidence_other".to_string())
            .one(&app.db)
            .await
            .unwrap();
        assert!(orphan.is_none());
    }

    #[tokio::test]
    async fn duplicate_evidence_id_conflicts() {
        let app = TestApp::spawn().await;
        app.create_cheater(Some(1), "evidence_1").await;

        let res = app
            .post(routes::CHEATERS, &cheater_payload(Some(2), "evidence_1"))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["error"], "DUPLICATE_ERROR");
        assert_eq!(cheater::Entity::find().count(&app.db).await.unwrap(), 1);
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn get_returns_cheater_with_matching_evidence() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let res = app.get(&routes::cheater(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["cheater"]["name"], "Jane Doe");
        assert_eq!(res.body["cheater"]["date"], "2025-03-14");
        assert_eq!(res.body["cheater"]["vjudgeId"], "jdoe");
        assert_eq!(res.body["evidence"]["title"], "Identical submissions");
        assert_eq!(
            res.body["evidence"]["submissionUrl"],
            "https://codeforces.com/contest/1/submission/2"
        );
        assert_eq!(
            res.body["evidence"]["details"],
            json!([
                "Same unused helper function",
                "Submitted within a minute of each other"
            ])
        );
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::cheater("abc")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::cheater(42)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn dangling_evidence_reference_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;
        evidence::Entity::delete_by_id("evidence_1".to_string())
            .exec(&app.db)
            .await
            .unwrap();

        let res = app.get(&routes::cheater(id)).await;

        assert_eq!(res.status, 404);
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::CHEATERS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["cheaters"], json!([]));
        assert_eq!(
            res.body["pagination"],
            json!({"total": 0, "page": 1, "limit": 50, "pages": 0})
        );
    }

    #[tokio::test]
    async fn second_page_of_ten_returns_ranks_eleven_to_twenty() {
        let app = TestApp::spawn().await;
        for i in 1..=25 {
            app.create_cheater(Some(i), &format!("evidence_{i}")).await;
        }

        let res = app.get(&routes::cheater_page(2, 10)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let ids: Vec<i64> = res.body["cheaters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, (6..=15).rev().collect::<Vec<i64>>());
        assert_eq!(
            res.body["pagination"],
            json!({"total": 25, "page": 2, "limit": 10, "pages": 3})
        );
    }

    #[tokio::test]
    async fn page_zero_is_treated_as_first_page() {
        let app = TestApp::spawn().await;
        app.create_cheater(None, "evidence_1").await;

        let res = app.get(&routes::cheater_page(0, 10)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["page"], 1);
        assert_eq!(res.body["cheaters"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        app.create_cheater(None, "evidence_1").await;

        for page in [u64::MAX, 200_000_000_000_000_000] {
            let res = app.get(&routes::cheater_page(page, 50)).await;

            assert_eq!(res.status, 200, "page={page}: {}", res.text);
            assert_eq!(res.body["cheaters"], json!([]));
            assert_eq!(res.body["pagination"]["page"], page);
            assert_eq!(res.body["pagination"]["total"], 1);
        }
    }

    #[tokio::test]
    async fn oversized_limit_is_clamped() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::cheater_page(1, 100_000)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["limit"], 500);
    }

    #[tokio::test]
    async fn non_numeric_query_is_bad_request() {
        let app = TestApp::spawn().await;

        let res = app.get("/api/cheaters?page=two").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "BAD_REQUEST");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn patches_both_records() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let res = app
            .put(
                &routes::cheater(id),
                &json!({
                    "cheater": {"punishment": "6 Month Ban"},
                    "evidence": {"details": ["Rewritten summary"]},
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Cheater updated successfully");
        assert_eq!(res.body["cheater"]["punishment"], "6 Month Ban");
        assert_eq!(res.body["cheater"]["isPermanent"], false);
        assert_eq!(res.body["cheater"]["name"], "Jane Doe");
        assert_eq!(res.body["evidence"]["details"], json!(["Rewritten summary"]));
        assert_eq!(res.body["evidence"]["title"], "Identical submissions");

        let fetched = app.get(&routes::cheater(id)).await;
        assert_eq!(fetched.body["cheater"]["punishment"], "6 Month Ban");
        assert_eq!(fetched.body["evidence"]["details"], json!(["Rewritten summary"]));
    }

    #[tokio::test]
    async fn evidence_only_patch_leaves_cheater_alone() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let res = app
            .put(
                &routes::cheater(id),
                &json!({"evidence": {"title": "Updated title"}}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["evidence"]["title"], "Updated title");
        assert_eq!(res.body["cheater"]["punishment"], "Permanent Ban");
    }

    #[tokio::test]
    async fn unknown_cheater_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put(&routes::cheater(9), &json!({"cheater": {"name": "X"}}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn changing_ids_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let cheater_id = app
            .put(&routes::cheater(id), &json!({"cheater": {"id": 99}}))
            .await;
        let evidence_id = app
            .put(&routes::cheater(id), &json!({"evidence": {"id": "evidence_99"}}))
            .await;

        assert_eq!(cheater_id.status, 400);
        assert_eq!(cheater_id.body["error"], "VALIDATION_ERROR");
        assert_eq!(evidence_id.status, 400);
        assert_eq!(evidence_id.body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected_and_nothing_changes() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let res = app
            .put(
                &routes::cheater(id),
                &json!({
                    "cheater": {"punishment": "Warning"},
                    "evidence": {"title": "   "},
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        let fetched = app.get(&routes::cheater(id)).await;
        assert_eq!(fetched.body["cheater"]["punishment"], "Permanent Ban");
    }

    #[tokio::test]
    async fn repointing_to_missing_evidence_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let res = app
            .put(
                &routes::cheater(id),
                &json!({"cheater": {"evidence": "evidence_missing"}}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn repointing_to_unlinked_evidence_patches_the_new_target() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;
        let now = chrono::Utc::now();
        evidence::ActiveModel {
            id: Set("evidence_spare".into()),
            title: Set("Spare".into()),
            submission_url: Set("https://example.com/spare".into()),
            details: Set(json!([])),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&app.db)
        .await
        .unwrap();

        let res = app
            .put(
                &routes::cheater(id),
                &json!({
                    "cheater": {"evidence": "evidence_spare"},
                    "evidence": {"title": "Now linked"},
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["cheater"]["evidence"], "evidence_spare");
        assert_eq!(res.body["evidence"]["id"], "evidence_spare");
        assert_eq!(res.body["evidence"]["title"], "Now linked");
    }

    #[tokio::test]
    async fn repointing_to_linked_evidence_conflicts() {
        let app = TestApp::spawn().await;
        let first = app.create_cheater(None, "evidence_1").await;
        app.create_cheater(None, "evidence_2").await;

        let res = app
            .put(
                &routes::cheater(first),
                &json!({"cheater": {"evidence": "evidence_2"}}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["error"], "DUPLICATE_ERROR");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn delete_cascades_to_evidence() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let res = app.delete(&routes::cheater(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            res.body["message"],
            "Cheater and associated evidence deleted successfully"
        );
        assert_eq!(evidence::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found_the_second_time() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;

        let first = app.delete(&routes::cheater(id)).await;
        let second = app.delete(&routes::cheater(id)).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 404);
        assert_eq!(second.body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_evidence_does_not_fail_delete() {
        let app = TestApp::spawn().await;
        let id = app.create_cheater(None, "evidence_1").await;
        evidence::Entity::delete_by_id("evidence_1".to_string())
            .exec(&app.db)
            .await
            .unwrap();

        let res = app.delete(&routes::cheater(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(cheater::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::cheater("x1")).await;

        assert_eq!(res.status, 400);
    }
}

#[tokio::test]
async fn create_get_delete_round_trip_on_empty_store() {
    let app = TestApp::spawn().await;

    let created = app
        .post(routes::CHEATERS, &cheater_payload(None, "evidence_1"))
        .await;
    assert_eq!(created.status, 201, "{}", created.text);
    assert_eq!(created.body["cheater"]["id"], 1);

    let fetched = app.get(&routes::cheater(1)).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["cheater"]["id"], 1);
    assert_eq!(fetched.body["cheater"]["name"], created.body["cheater"]["name"]);
    assert_eq!(fetched.body["evidence"]["id"], "evidence_1");
    assert_eq!(
        fetched.body["evidence"]["details"],
        created.body["evidence"]["details"]
    );

    let deleted = app.delete(&routes::cheater(1)).await;
    assert_eq!(deleted.status, 200);

    let gone = app.get(&routes::cheater(1)).await;
    assert_eq!(gone.status, 404);

    let listed = app.get(&routes::cheater_page(1, 50)).await;
    assert_eq!(listed.body["pagination"]["total"], 0);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::spawn().await;

    let health = app.get(routes::HEALTH).await;
    assert_eq!(health.status, 200);
    assert_eq!(health.body["status"], "ok");

    let doc = app.get(routes::OPENAPI).await;
    assert_eq!(doc.status, 200);
    assert!(doc.body["paths"]["/api/cheaters/{id}"].is_object());
}
