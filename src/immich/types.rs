use serde::Deserialize;

/// One entry of the face recognition roster from `/api/people`.
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: String,
    /// Faces the server has not named yet come back with a null or missing name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from `/api/people`. Depending on server version this endpoint has
/// returned either an object wrapping the list or the bare list itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PeopleResponse {
    Wrapped { people: Vec<Person> },
    Bare(Vec<Person>),
}

impl PeopleResponse {
    pub fn into_people(self) -> Vec<Person> {
        match self {
            PeopleResponse::Wrapped { people } => people,
            PeopleResponse::Bare(people) => people,
        }
    }
}

/// One media item as returned by the search and album endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub original_file_name: String,
}

/// Response from `/api/search/metadata`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub assets: SearchPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<Asset>,
}

/// Response from `/api/albums/{id}`; only the member list is consumed.
#[derive(Debug, Deserialize)]
pub struct AlbumAssetsResponse {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// One album from `/api/albums`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub album_name: String,
}

/// Per-asset outcome of a bulk album add.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkIdResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl BulkIdResult {
    /// The server rejects ids that are already album members with a
    /// "duplicate" error; that outcome still means the asset is present.
    pub fn is_duplicate(&self) -> bool {
        !self.success && self.error.as_deref() == Some("duplicate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_people_response_wrapped() {
        let json = r#"{
            "people": [
                {"id": "b93e9b13-0e1c-4e5e-8a3b-0f6a5c9f3d2a", "name": "Alice"},
                {"id": "c4f7a2d1-5b6e-4f3a-9c8d-1e2f3a4b5c6d", "name": "Bob"}
            ],
            "total": 2,
            "hidden": 0
        }"#;
        let people = serde_json::from_str::<PeopleResponse>(json)
            .unwrap()
            .into_people();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name.as_deref(), Some("Alice"));
        assert_eq!(people[1].id, "c4f7a2d1-5b6e-4f3a-9c8d-1e2f3a4b5c6d");
    }

    #[test]
    fn test_people_response_bare_list() {
        let json = r#"[{"id": "p1", "name": "Alice"}]"#;
        let people = serde_json::from_str::<PeopleResponse>(json)
            .unwrap()
            .into_people();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, "p1");
    }

    #[test]
    fn test_person_null_or_missing_name() {
        let json = r#"[{"id": "p1", "name": null}, {"id": "p2"}]"#;
        let people = serde_json::from_str::<PeopleResponse>(json)
            .unwrap()
            .into_people();
        assert_eq!(people[0].name, None);
        assert_eq!(people[1].name, None);
    }

    #[test]
    fn test_search_response_page() {
        let json = r#"{
            "albums": {"items": [], "total": 0},
            "assets": {
                "items": [
                    {"id": "a1", "originalFileName": "IMG_0001.jpg", "type": "IMAGE"},
                    {"id": "a2", "originalFileName": "IMG_0002.jpg", "type": "IMAGE"}
                ],
                "total": 2,
                "nextPage": null
            }
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.assets.items.len(), 2);
        assert_eq!(resp.assets.items[0].original_file_name, "IMG_0001.jpg");
    }

    #[test]
    fn test_search_response_missing_assets() {
        let json = r#"{}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(resp.assets.items.is_empty());
    }

    #[test]
    fn test_asset_missing_filename() {
        let json = r#"{"id": "a1"}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.id, "a1");
        assert!(asset.original_file_name.is_empty());
    }

    #[test]
    fn test_album_assets_response() {
        let json = r#"{
            "id": "al1",
            "albumName": "Family",
            "assets": [{"id": "a1", "originalFileName": "x.jpg"}, {"id": "a2"}]
        }"#;
        let resp: AlbumAssetsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.assets.len(), 2);
        assert_eq!(resp.assets[1].id, "a2");
    }

    #[test]
    fn test_album_assets_empty() {
        let json = r#"{"id": "al1", "albumName": "Family"}"#;
        let resp: AlbumAssetsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.assets.is_empty());
    }

    #[test]
    fn test_album_list_entry() {
        let json = r#"{"id": "al1", "albumName": "Family", "assetCount": 12}"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.album_name, "Family");
    }

    #[test]
    fn test_bulk_id_result_duplicate() {
        let json = r#"[
            {"id": "a1", "success": true},
            {"id": "a2", "success": false, "error": "duplicate"},
            {"id": "a3", "success": false, "error": "not_found"}
        ]"#;
        let results: Vec<BulkIdResult> = serde_json::from_str(json).unwrap();
        assert!(!results[0].is_duplicate());
        assert!(results[0].success);
        assert!(results[1].is_duplicate());
        assert!(!results[2].is_duplicate());
        assert_eq!(results[2].error.as_deref(), Some("not_found"));
    }
}
