use serde::{Deserialize, Serialize};

/// Columns the source file must carry. Anything else in the header is ignored.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "Order_ID",
    "Delivery_Time",
    "Agent_Rating",
    "Agent_Age",
    "Weather",
    "Traffic",
    "Vehicle",
    "Area",
    "Category",
    "Store_Latitude",
    "Store_Longitude",
];

/// Raw record from CSV ingestion, every cell kept as text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Order_ID")]
    pub order_id: Option<String>,
    #[serde(rename = "Delivery_Time")]
    pub delivery_time: Option<String>,
    #[serde(rename = "Agent_Rating")]
    pub agent_rating: Option<String>,
    #[serde(rename = "Agent_Age")]
    pub agent_age: Option<String>,
    #[serde(rename = "Weather")]
    pub weather: Option<String>,
    #[serde(rename = "Traffic")]
    pub traffic: Option<String>,
    #[serde(rename = "Vehicle")]
    pub vehicle: Option<String>,
    #[serde(rename = "Area")]
    pub area: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Store_Latitude")]
    pub store_latitude: Option<String>,
    #[serde(rename = "Store_Longitude")]
    pub store_longitude: Option<String>,
}

/// A row that survived cleaning: duration and the four required
/// categorical fields are guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub order_id: Option<String>,
    pub delivery_time: f64,
    pub agent_rating: Option<f64>,
    pub agent_age: Option<f64>,
    pub weather: String,
    pub traffic: String,
    pub vehicle: String,
    pub area: String,
    pub category: Option<String>,
    pub store_latitude: Option<f64>,
    pub store_longitude: Option<f64>,
}

/// Cleaned delivery with the derived late flag.
///
/// Serialises with the source column names so the filtered table can be
/// shown or exported exactly as it was read, plus `Is_Late`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    #[serde(rename = "Order_ID")]
    pub order_id: Option<String>,
    #[serde(rename = "Delivery_Time")]
    pub delivery_time: f64,
    #[serde(rename = "Agent_Rating")]
    pub agent_rating: Option<f64>,
    #[serde(rename = "Agent_Age")]
    pub agent_age: Option<f64>,
    #[serde(rename = "Weather")]
    pub weather: String,
    #[serde(rename = "Traffic")]
    pub traffic: String,
    #[serde(rename = "Vehicle")]
    pub vehicle: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Store_Latitude")]
    pub store_latitude: Option<f64>,
    #[serde(rename = "Store_Longitude")]
    pub store_longitude: Option<f64>,
    #[serde(rename = "Is_Late")]
    pub is_late: bool,
}

impl CleanRecord {
    pub fn with_late(self, is_late: bool) -> DeliveryRecord {
        DeliveryRecord {
            order_id: self.order_id,
            delivery_time: self.delivery_time,
            agent_rating: self.agent_rating,
            agent_age: self.agent_age,
            weather: self.weather,
            traffic: self.traffic,
            vehicle: self.vehicle,
            area: self.area,
            category: self.category,
            store_latitude: self.store_latitude,
            store_longitude: self.store_longitude,
            is_late,
        }
    }
}

impl From<&CleanRecord> for RawRecord {
    fn from(r: &CleanRecord) -> Self {
        let num = |v: Option<f64>| v.map(|x| x.to_string());
        RawRecord {
            order_id: r.order_id.clone(),
            delivery_time: Some(r.delivery_time.to_string()),
            agent_rating: num(r.agent_rating),
            agent_age: num(r.agent_age),
            weather: Some(r.weather.clone()),
            traffic: Some(r.traffic.clone()),
            vehicle: Some(r.vehicle.clone()),
            area: Some(r.area.clone()),
            category: r.category.clone(),
            store_latitude: num(r.store_latitude),
            store_longitude: num(r.store_longitude),
        }
    }
}
