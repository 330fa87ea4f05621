use axum::{
    extract::State,
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extractors::AppQuery;
use crate::jobs::recommend::pick_query;
use crate::jobs::scraper::{JobPosting, SearchQuery};
use crate::profiles::resolve_profile_index;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub selected_profile: Option<i64>,
}

/// GET /search
pub async fn handle_search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    if query.is_empty() {
        return Err(AppError::Validation(
            "At least one of keywords, company or location is required".to_string(),
        ));
    }
    Ok(Json(state.scraper.search(&query).await?))
}

/// GET /getRecommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppQuery(params): AppQuery<RecommendationParams>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let index = resolve_profile_index(&current.user, params.selected_profile)?;
    let query = pick_query(&current.user.profiles[index], &mut rand::rng())?;
    Ok(Json(state.scraper.search(&query).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::jobs::scraper::JobPosting;
    use crate::models::user::Profile;
    use crate::test_support::{send, TestApp};

    fn posting() -> JobPosting {
        JobPosting {
            title: "Lead Software Engineer, Python".into(),
            company: "Capital One".into(),
            location: "New York, NY (Onsite)".into(),
            job_type: "Full-Time".into(),
            link: "https://www.careerbuilder.com/job/J3P3X46H8P66TWM8THD".into(),
            id: "J3P3X46H8P66TWM8THD".into(),
        }
    }

    #[tokio::test]
    async fn test_search_forwards_query() {
        let app = TestApp::with_postings(vec![posting()]);
        let (status, body) = send(
            &app.router,
            "GET",
            "/search?keywords=python&location=New%20York",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["type"], "Full-Time");
        assert_eq!(body[0]["id"], "J3P3X46H8P66TWM8THD");

        let queries = app.scraper.queries().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].keywords, "python");
        assert_eq!(queries[0].location, "New York");
        assert_eq!(queries[0].company, "");
    }

    #[tokio::test]
    async fn test_empty_search_never_scrapes() {
        let app = TestApp::with_postings(vec![posting()]);
        for uri in ["/search", "/search?keywords=&company=&location="] {
            let (status, body) = send(&app.router, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }
        assert!(app.scraper.queries().await.is_empty());
    }

    #[tokio::test]
    async fn test_recommendations_use_selected_profile() {
        let app = TestApp::with_postings(vec![posting()]);
        let token = app.seed_user(1).await;
        app.edit_user(1, |u| {
            let mut chosen = Profile::named("Search");
            chosen.skills = vec!["Python".into()];
            chosen.job_levels = vec!["Senior".into()];
            chosen.locations = vec!["New York".into()];
            u.profiles = vec![Profile::named("Empty"), chosen];
        })
        .await;

        let (status, body) = send(
            &app.router,
            "GET",
            "/getRecommendations?selected_profile=1",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let queries = app.scraper.queries().await;
        assert_eq!(queries[0].keywords, "Python Senior");
        assert_eq!(queries[0].location, "New York");
        assert_eq!(queries[0].company, "");
    }

    #[tokio::test]
    async fn test_recommendations_reject_incomplete_profile() {
        let app = TestApp::with_postings(vec![posting()]);
        let token = app.seed_user(1).await;
        app.edit_user(1, |u| {
            let mut p = Profile::named("No locations");
            p.skills = vec!["Python".into()];
            u.profiles = vec![p];
        })
        .await;

        let (status, body) =
            send(&app.router, "GET", "/getRecommendations", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No skills and/or locations found");
        assert!(app.scraper.queries().await.is_empty());

        let (status, _) = send(
            &app.router,
            "GET",
            "/getRecommendations?selected_profile=4",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommendations_without_profiles() {
        let app = TestApp::new();
        let token = app.seed_user(1).await;
        let (status, body) =
            send(&app.router, "GET", "/getRecommendations", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NO_RECORDS");
    }
}
