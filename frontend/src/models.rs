//! DTOs exchanged with the backend.
//!
//! Only the fields the pages read or edit are typed; everything else lands in
//! `extra` and is written back untouched on update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Extra = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub ref_code: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub type_intervention: Option<String>,
    #[serde(default)]
    pub valeur_euro: Option<f64>,
    #[serde(default)]
    pub point_examiner: Option<String>,
    #[serde(default)]
    pub nature_intervention: Option<String>,
    #[serde(default)]
    pub poste_touche: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub numero_panneau: Option<String>,
    #[serde(default, rename = "nomPrenomBB")]
    pub nom_prenom_bb: Option<String>,
    #[serde(default)]
    pub temps_intervention: Option<f64>,
    /// ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub commentaire: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Sites, packs and projects share one shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NamedRecord {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

pub type Site = NamedRecord;
pub type Pack = NamedRecord;
pub type Project = NamedRecord;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub fb_name: Option<String>,
    #[serde(default)]
    pub fb_id: Option<String>,
    #[serde(default)]
    pub fb_size: Option<String>,
    #[serde(default)]
    pub projet: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default, rename = "fbType1")]
    pub fb_type1: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub storage_place: Option<String>,
    #[serde(default)]
    pub in_use: Option<String>,
    #[serde(default)]
    pub test_clip: Option<bool>,
    #[serde(default)]
    pub current_tech_level: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub pack_id: Option<i64>,
    #[serde(default)]
    pub assigned_user_id: Option<i64>,
    #[serde(default)]
    pub comment1: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Board {
    pub fn label(&self) -> String {
        match (&self.fb_name, &self.fb_id) {
            (Some(name), Some(id)) if !id.is_empty() => format!("{name} ({id})"),
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => format!("Board #{}", self.id.unwrap_or_default()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    pub id: i64,
    #[serde(default)]
    pub board_id: Option<i64>,
    #[serde(default)]
    pub bom_lines: Vec<BomLine>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    /// `None` for lines not saved yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub inventory_item_id: Option<i64>,
    #[serde(default)]
    pub component_name: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub line_cost: f64,
    #[serde(default)]
    pub unit_names: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub matricule: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default, alias = "ipAddress")]
    pub ip_address: Option<String>,
}

/// One page of a paged listing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub site_id: i64,
    pub pack_id: i64,
    pub week_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub board_id: i64,
    #[serde(default)]
    pub technician_name: String,
    #[serde(default)]
    pub quality_agent_name: String,
    #[serde(default)]
    pub completion_percentage: u8,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub quality_validated: bool,
    #[serde(default)]
    pub validation_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default = "not_started")]
    pub work_status: String,
}

fn not_started() -> String {
    "NOT_STARTED".into()
}

pub const WORK_STATUSES: [&str; 3] = ["NOT_STARTED", "IN_PROGRESS", "COMPLETED"];

impl Checklist {
    pub fn blank(board_id: i64) -> Self {
        Self {
            id: None,
            board_id,
            technician_name: String::new(),
            quality_agent_name: String::new(),
            completion_percentage: 0,
            comments: String::new(),
            quality_validated: false,
            validation_date: None,
            expiry_date: None,
            work_status: not_started(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub matricule: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{"id":4,"fbName":"FB-1","projet":"P7","firstGreenReleaseDate":"2024-02-01","comment2":null}"#;
        let board: Board = serde_json::from_str(raw).unwrap();
        assert_eq!(board.fb_name.as_deref(), Some("FB-1"));
        assert_eq!(board.extra["firstGreenReleaseDate"], "2024-02-01");

        let back = serde_json::to_value(&board).unwrap();
        assert_eq!(back["firstGreenReleaseDate"], "2024-02-01");
        assert_eq!(back["projet"], "P7");
    }

    #[test]
    fn inventory_type_field_is_renamed() {
        let item: InventoryItem =
            serde_json::from_str(r#"{"id":1,"refCode":"R1","type":"khm","quantity":3,"price":null}"#).unwrap();
        assert_eq!(item.kind.as_deref(), Some("khm"));
        assert_eq!(item.price, None);
        assert_eq!(serde_json::to_value(&item).unwrap()["type"], "khm");
    }

    #[test]
    fn audit_page_shape() {
        let page: Page<AuditLog> = serde_json::from_str(
            r#"{"content":[{"id":1,"action":"LOGIN","ip_address":"10.0.0.1"}],"totalPages":3,"totalElements":21}"#,
        )
        .unwrap();
        assert_eq!(page.total_elements, 21);
        assert_eq!(page.content[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn checklist_defaults() {
        let c: Checklist = serde_json::from_str(r#"{"id":2,"boardId":9}"#).unwrap();
        assert_eq!(c.work_status, "NOT_STARTED");
        assert!(!c.quality_validated);
    }
}
