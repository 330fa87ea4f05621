use rand::seq::IndexedRandom;
use rand::Rng;

use crate::errors::AppError;
use crate::jobs::scraper::SearchQuery;
use crate::models::user::Profile;

/// Picks one skill, one job level (if any) and one location at random.
///
/// Keywords are `"<skill> <level>"`; with no job levels the level is empty,
/// leaving a trailing space. The company filter is always empty.
pub fn pick_query<R: Rng + ?Sized>(profile: &Profile, rng: &mut R) -> Result<SearchQuery, AppError> {
    let (Some(skill), Some(location)) = (profile.skills.choose(rng), profile.locations.choose(rng))
    else {
        return Err(AppError::Validation(
            "No skills and/or locations found".to_string(),
        ));
    };
    let level = profile
        .job_levels
        .choose(rng)
        .map(String::as_str)
        .unwrap_or("");

    Ok(SearchQuery {
        keywords: format!("{skill} {level}"),
        company: String::new(),
        location: location.clone(),
    })
}
