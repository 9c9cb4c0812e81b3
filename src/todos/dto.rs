use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::todos::repo_types::Status;

pub const MIN_BUCKET: i32 = 1;
pub const MAX_BUCKET: i32 = 5;

// `status` arrives as a raw string so out-of-range values become a 400
// with field detail instead of a serde rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub title: String,
    pub year_bucket: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTodoRequest {
    pub status: String,
    pub year_bucket: i32,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: i64,
    pub completed: bool,
    pub status: Status,
}

fn parse_status(s: &str) -> Result<Status, ApiError> {
    s.parse().map_err(|_| ApiError::Validation {
        field: "status",
        reason: "must be one of todo, inprogress, done",
    })
}

fn check_bucket(bucket: i32) -> Result<i32, ApiError> {
    if (MIN_BUCKET..=MAX_BUCKET).contains(&bucket) {
        Ok(bucket)
    } else {
        Err(ApiError::Validation {
            field: "yearBucket",
            reason: "must be between 1 and 5",
        })
    }
}

impl CreateTodoRequest {
    /// Applies defaults (`yearBucket` 1, `status` todo) and validates
    /// everything before any store write.
    pub fn validate(&self) -> Result<(&str, Status, i32), ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation {
                field: "title",
                reason: "must not be empty",
            });
        }
        let status = match self.status.as_deref() {
            Some(s) => parse_status(s)?,
            None => Status::Todo,
        };
        let bucket = check_bucket(self.year_bucket.unwrap_or(MIN_BUCKET))?;
        Ok((title, status, bucket))
    }
}

impl MoveTodoRequest {
    pub fn validate(&self) -> Result<(Status, i32), ApiError> {
        let status = parse_status(&self.status)?;
        let bucket = check_bucket(self.year_bucket)?;
        Ok((status, bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(json: serde_json::Value) -> CreateTodoRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_defaults_applied_when_fields_omitted() {
        let req = create_req(serde_json::json!({ "title": "Buy milk" }));
        let (title, status, bucket) = req.validate().unwrap();
        assert_eq!(title, "Buy milk");
        assert_eq!(status, Status::Todo);
        assert_eq!(bucket, 1);
    }

    #[test]
    fn create_accepts_explicit_status_and_bucket() {
        let req = create_req(serde_json::json!({
            "title": "Ship it",
            "status": "done",
            "yearBucket": 5
        }));
        let (_, status, bucket) = req.validate().unwrap();
        assert_eq!(status, Status::Done);
        assert_eq!(bucket, 5);
    }

    #[test]
    fn create_rejects_blank_title() {
        let req = create_req(serde_json::json!({ "title": "   " }));
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation { field: "title", .. }
        ));
    }

    #[test]
    fn create_rejects_unknown_status() {
        let req = create_req(serde_json::json!({ "title": "x", "status": "blocked" }));
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation { field: "status", .. }
        ));
    }

    #[test]
    fn bucket_bounds_are_inclusive() {
        for bucket in [1, 5] {
            let req = create_req(serde_json::json!({ "title": "x", "yearBucket": bucket }));
            assert!(req.validate().is_ok());
        }
        for bucket in [0, 6, -1] {
            let req = create_req(serde_json::json!({ "title": "x", "yearBucket": bucket }));
            let err = req.validate().unwrap_err();
            assert!(matches!(
                err,
                ApiError::Validation {
                    field: "yearBucket",
                    ..
                }
            ));
        }
    }

    #[test]
    fn move_validates_both_fields() {
        let req: MoveTodoRequest =
            serde_json::from_value(serde_json::json!({ "status": "inprogress", "yearBucket": 3 }))
                .unwrap();
        assert_eq!(req.validate().unwrap(), (Status::Inprogress, 3));

        let req: MoveTodoRequest =
            serde_json::from_value(serde_json::json!({ "status": "later", "yearBucket": 3 }))
                .unwrap();
        assert!(req.validate().is_err());

        let req: MoveTodoRequest =
            serde_json::from_value(serde_json::json!({ "status": "todo", "yearBucket": 9 }))
                .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn toggle_response_shape() {
        let res = ToggleResponse {
            id: 4,
            completed: true,
            status: Status::Done,
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["completed"], true);
        assert_eq!(json["status"], "done");
    }
}
