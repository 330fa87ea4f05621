use serde::{Deserialize, Deserializer, Serialize};

/// A tracked job application. `id` is unique within one user's list only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "jobLink", default)]
    pub job_link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "jobType", default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "externalId", default)]
    pub external_id: Option<String>,
}

/// Client-supplied application fields. Used both for creation (title and
/// company required) and for merge updates (only present fields apply).
///
/// The optional columns distinguish an omitted key (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored value on merge.
///
/// Accepts the search-result spelling (`title`, `company`, `link`, `type`)
/// as well as the stored one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationDraft {
    #[serde(rename = "jobTitle", alias = "title")]
    pub job_title: Option<String>,
    #[serde(rename = "companyName", alias = "company")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Option<String>>,
    #[serde(rename = "jobLink", alias = "link", default, deserialize_with = "present")]
    pub job_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    #[serde(rename = "jobType", alias = "type", default, deserialize_with = "present")]
    pub job_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(rename = "externalId", default, deserialize_with = "present")]
    pub external_id: Option<Option<String>>,
}

/// Only called for keys that appear in the input, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body: either `{"application": {...}}` or the fields directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApplicationBody {
    Wrapped { application: ApplicationDraft },
    Bare(ApplicationDraft),
}

impl ApplicationBody {
    pub fn into_draft(self) -> ApplicationDraft {
        match self {
            ApplicationBody::Wrapped { application } => application,
            ApplicationBody::Bare(draft) => draft,
        }
    }
}

impl Application {
    /// Overwrites every field present in `draft`; absent fields keep their value
    /// and an explicit `null` clears an optional one.
    pub fn merge(&mut self, draft: ApplicationDraft) {
        let ApplicationDraft {
            job_title,
            company_name,
            date,
            job_link,
            location,
            job_type,
            status,
            external_id,
        } = draft;

        if let Some(v) = job_title {
            self.job_title = v;
        }
        if let Some(v) = company_name {
            self.company_name = v;
        }
        if let Some(v) = date {
            self.date = v;
        }
        if let Some(v) = job_link {
            self.job_link = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = job_type {
            self.job_type = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = external_id {
            self.external_id = v;
        }
    }
}
