pub mod health;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::auth::middleware::require_auth;
use crate::coverletters::handlers as coverletters;
use crate::jobs::handlers as jobs;
use crate::profiles::handlers as profiles;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(health::health_handler))
        .route("/users/signup", post(auth::handle_signup))
        .route("/users/login", post(auth::handle_login))
        .route("/users/signupGoogle", get(auth::handle_google_signup))
        .route(
            "/users/signupGoogle/authorized",
            get(auth::handle_google_authorized),
        )
        .route("/search", get(jobs::handle_search));

    let protected = Router::new()
        .route("/users/logout", post(auth::handle_logout))
        // Applications
        .route(
            "/applications",
            get(applications::handle_list_applications).post(applications::handle_add_application),
        )
        .route(
            "/applications/:id",
            put(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        // Profiles
        .route(
            "/getProfile",
            get(profiles::handle_get_default_profile).post(profiles::handle_get_default_profile),
        )
        .route(
            "/getProfile/:id",
            get(profiles::handle_get_profile).post(profiles::handle_get_profile),
        )
        .route(
            "/updateProfile",
            get(profiles::handle_update_default_profile)
                .post(profiles::handle_update_default_profile),
        )
        .route(
            "/updateProfile/:id",
            get(profiles::handle_update_profile).post(profiles::handle_update_profile),
        )
        .route("/createProfile", post(profiles::handle_create_profile))
        .route(
            "/setDefaultProfile/:id",
            post(profiles::handle_set_default_profile),
        )
        .route("/getProfileList", get(profiles::handle_list_profiles))
        // Résumés and feedback
        .route(
            "/resume",
            get(resumes::handle_list_resumes).post(resumes::handle_upload_resume),
        )
        .route(
            "/resume/:idx",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route("/resume-feedback", get(resumes::handle_list_feedback))
        .route("/resume-feedback/:idx", get(resumes::handle_get_feedback))
        .route(
            "/cover_letter/:idx",
            post(resumes::handle_generate_cover_letter),
        )
        // Cover letters
        .route(
            "/coverletters",
            get(coverletters::handle_list_cover_letters)
                .post(coverletters::handle_create_cover_letter),
        )
        .route(
            "/coverletters/:idx",
            get(coverletters::handle_get_cover_letter)
                .put(coverletters::handle_update_cover_letter)
                .delete(coverletters::handle_delete_cover_letter),
        )
        // Jobs
        .route("/getRecommendations", get(jobs::handle_recommendations))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}
