use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Equipment;

// ============================================================================
// Order Number - AAA-NNNN-NNNN-NNNNN
// ============================================================================

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SEGMENT_LENGTHS: [usize; 4] = [3, 4, 4, 5];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderNumberError {
    #[error("Please fill all parts of the order number.")]
    IncompleteSegments,

    #[error("Invalid order number \"{0}\": expected format AAA-NNNN-NNNN-NNNNN")]
    InvalidFormat(String),
}

impl OrderNumber {
    /// Random number in the canonical format. Uniqueness is the caller's job.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let prefix: String = (0..3)
            .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
            .collect();
        let p2 = rng.gen_range(1000..10000);
        let p3 = rng.gen_range(1000..10000);
        let p4 = rng.gen_range(10000..100000);
        Self(format!("{}-{}-{}-{}", prefix, p2, p3, p4))
    }

    /// Parse search-box input. Letters are uppercased before validation.
    pub fn parse(input: &str) -> Result<Self, OrderNumberError> {
        let normalized = input.trim().to_ascii_uppercase();
        let segments: Vec<&str> = normalized.split('-').collect();

        if segments.len() != SEGMENT_LENGTHS.len() {
            return Err(OrderNumberError::InvalidFormat(input.to_string()));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(OrderNumberError::IncompleteSegments);
        }

        for (i, (segment, len)) in segments.iter().zip(SEGMENT_LENGTHS).enumerate() {
            let well_formed = segment.len() == len
                && if i == 0 {
                    segment.bytes().all(|b| b.is_ascii_uppercase())
                } else {
                    segment.bytes().all(|b| b.is_ascii_digit())
                };
            if !well_formed {
                return Err(OrderNumberError::InvalidFormat(input.to_string()));
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}

impl PartialEq<str> for OrderNumber {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// ============================================================================
// Order Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    FinancialApprovalInProgress,
    FinancialApproved,
    FinancialRejected,
    VehicleDeliveryInProgress,
    Delivered,
    Finished,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Created,
        OrderStatus::FinancialApprovalInProgress,
        OrderStatus::FinancialApproved,
        OrderStatus::FinancialRejected,
        OrderStatus::VehicleDeliveryInProgress,
        OrderStatus::Delivered,
        OrderStatus::Finished,
        OrderStatus::Cancelled,
    ];

    /// Human-readable label used in audit entries and messages
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::FinancialApprovalInProgress => "Financial Approval In Progress",
            OrderStatus::FinancialApproved => "Financial Approved",
            OrderStatus::FinancialRejected => "Financial Rejected",
            OrderStatus::VehicleDeliveryInProgress => "Vehicle Delivery In Progress",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Finished => "Finished",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Embedded snapshots
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl From<&Equipment> for EquipmentItem {
    fn from(eq: &Equipment) -> Self {
        Self {
            id: eq.id.to_string(),
            name: eq.name.to_string(),
            price: eq.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCarInfo {
    pub model_id: String,
    pub model_name: String,
    pub base_price: f64,
    pub selected_equipment: Vec<EquipmentItem>,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLoanInfo {
    pub bank_id: String,
    pub bank_name: String,
    pub plan_id: String,
    pub plan_name: String,
    pub requested_amount: f64,
    pub interest_rate: f64,
    pub term_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialApproval {
    pub approved_interest: f64,
    pub approved_duration: u32,
    pub approved_amount: f64,
    pub approved_by: String,
    pub approved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDelivery {
    pub vin: String,
    pub manufacture_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Everything the caller supplies to create an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreationData {
    pub account_id: String,
    pub account_name: String,
    pub account_email: String,
    pub store_id: String,
    pub store_name: String,
    pub car_info: OrderCarInfo,
    pub loan_required: bool,
    #[serde(default)]
    pub loan_info: Option<OrderLoanInfo>,
    pub total_order_amount: f64,
}

// ============================================================================
// Unit Tests
// ============================================================================
