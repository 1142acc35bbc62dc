use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank mentors for a mentee
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "mentee_id", rename = "menteeId")]
    pub mentee_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "area_id", rename = "areaId")]
    pub area_id: String,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query string for listing the mentors of an area
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListMentorsQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "area_id", rename = "areaId")]
    pub area_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches_request_validation() {
        let valid: FindMatchesRequest =
            serde_json::from_str(r#"{"menteeId":"u1","areaId":"web"}"#).unwrap();
        assert!(valid.validate().is_ok());
        assert_eq!(valid.limit, None);

        let snake: FindMatchesRequest =
            serde_json::from_str(r#"{"mentee_id":"u1","area_id":"web","limit":5}"#).unwrap();
        assert!(snake.validate().is_ok());
        assert_eq!(snake.limit, Some(5));

        let empty: FindMatchesRequest =
            serde_json::from_str(r#"{"menteeId":"","areaId":"web"}"#).unwrap();
        assert!(empty.validate().is_err());

        let too_many: FindMatchesRequest =
            serde_json::from_str(r#"{"menteeId":"u1","areaId":"web","limit":500}"#).unwrap();
        assert!(too_many.validate().is_err());
    }
}
