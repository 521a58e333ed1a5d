//! Order data model and the administrative decision merge.

use chrono::{DateTime, Utc};
use custom_orders_auth::{Principal, PrincipalId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title used when the submitter leaves it blank.
pub const DEFAULT_TITLE: &str = "Custom Cup";

/// Unique identifier for an order, assigned by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Generate a new random `OrderId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a path segment. Anything that is not a UUID yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Review status of an order.
///
/// ```text
///              approve            disapprove
/// not_viewed ──────────▶ approved ◀──────────▶ disapproved
///      │                                           ▲
///      └────────────────── disapprove ─────────────┘
/// ```
///
/// No state is terminal: an admin can always issue the opposite decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, no decision yet.
    #[default]
    NotViewed,
    /// Accepted by an admin.
    Approved,
    /// Rejected by an admin.
    Disapproved,
}

impl OrderStatus {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotViewed => "not_viewed",
            Self::Approved => "approved",
            Self::Disapproved => "disapproved",
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "not_viewed" => Some(Self::NotViewed),
            "approved" => Some(Self::Approved),
            "disapproved" => Some(Self::Disapproved),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted custom order.
///
/// `id`, `owner_id`, `owner_email` and `created_at` never change after insert;
/// only a [`Decision`] touches `status`, `price` and `comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Repository-assigned identifier.
    pub id: OrderId,
    /// Principal who created the order.
    pub owner_id: PrincipalId,
    /// Owner's email at creation time.
    pub owner_email: String,
    /// Short title.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Review status.
    pub status: OrderStatus,
    /// Price set on approval.
    pub price: Option<f64>,
    /// Admin comments.
    pub comments: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Untrusted creation input, as posted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Optional title; blank means [`DEFAULT_TITLE`].
    pub title: Option<String>,
    /// Optional description; absent means empty.
    pub description: Option<String>,
}

impl NewOrder {
    /// Resolve defaults and bind the order to its creator.
    #[must_use]
    pub fn into_draft(self, principal: &Principal, now: DateTime<Utc>) -> OrderDraft {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        OrderDraft {
            owner_id: principal.id,
            owner_email: principal.email.clone(),
            title,
            description: self.description.unwrap_or_default(),
            created_at: now,
        }
    }
}

/// A validated order that has not been stored yet (no id, no status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Creator.
    pub owner_id: PrincipalId,
    /// Creator's email snapshot.
    pub owner_email: String,
    /// Title with the default applied.
    pub title: String,
    /// Description with the default applied.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Materialize the draft under `id` with status `not_viewed`.
    #[must_use]
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            owner_id: self.owner_id,
            owner_email: self.owner_email,
            title: self.title,
            description: self.description,
            status: OrderStatus::NotViewed,
            price: None,
            comments: None,
            created_at: self.created_at,
        }
    }
}

/// An administrator's decision on an order.
///
/// Decoded once at the boundary; anything that is not `approve` or
/// `disapprove` becomes [`Decision::NoOp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// Mark approved, optionally setting price and comments.
    Approve {
        /// Price to record, if supplied.
        price: Option<f64>,
        /// Comments to record, if supplied.
        comments: Option<String>,
    },
    /// Mark disapproved, optionally setting comments.
    Disapprove {
        /// Comments to record, if supplied.
        comments: Option<String>,
    },
    /// Leave the order untouched.
    NoOp,
}

impl Decision {
    /// Decode the raw form fields.
    ///
    /// Empty or whitespace-only comments count as absent. Price is already
    /// parsed; a supplied `0` is a real price.
    #[must_use]
    pub fn decode(action: Option<&str>, price: Option<f64>, comments: Option<String>) -> Self {
        let comments = comments.filter(|c| !c.trim().is_empty());

        match action {
            Some("approve") => Self::Approve { price, comments },
            Some("disapprove") => Self::Disapprove { comments },
            _ => Self::NoOp,
        }
    }

    /// Merge the decision into `order`.
    ///
    /// Supplied values overwrite, absent values leave the previous ones in
    /// place. Identity fields are never touched.
    pub fn apply(&self, order: &mut Order) {
        match self {
            Self::Approve { price, comments } => {
                order.status = OrderStatus::Approved;
                if let Some(price) = price {
                    order.price = Some(*price);
                }
                if let Some(comments) = comments {
                    order.comments = Some(comments.clone());
                }
            }
            Self::Disapprove { comments } => {
                order.status = OrderStatus::Disapproved;
                if let Some(comments) = comments {
                    order.comments = Some(comments.clone());
                }
            }
            Self::NoOp => {}
        }
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Disapprove { .. } => "disapprove",
            Self::NoOp => "noop",
        }
    }
}
