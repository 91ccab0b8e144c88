use chrono::NaiveDateTime;
use query_core::TextFilter;

/// Customer as stored. Timestamps are UTC, whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub customer_id: i32,
    pub store_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i32>,
    pub active: bool,
    pub create_date: NaiveDateTime,
    pub last_update: NaiveDateTime,
}

/// Data for creating a new customer. Every field is optional; `active`
/// defaults to true.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewCustomer {
    pub store_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i32>,
    pub active: Option<bool>,
}

/// Partial update. The outer `Option` says whether the field was sent;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerPatch {
    pub store_id: Option<Option<i32>>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address_id: Option<Option<i32>>,
    pub active: Option<bool>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to an in-memory record.
    pub fn apply_to(&self, c: &mut Customer) {
        if let Some(v) = self.store_id {
            c.store_id = v;
        }
        if let Some(v) = &self.first_name {
            c.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            c.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            c.email = v.clone();
        }
        if let Some(v) = self.address_id {
            c.address_id = v;
        }
        if let Some(v) = self.active {
            c.active = v;
        }
    }
}

/// Substring filters for customer listings, AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerFilter {
    pub first_name: Option<TextFilter>,
    pub last_name: Option<TextFilter>,
    pub email: Option<TextFilter>,
}

impl CustomerFilter {
    /// Build from raw parameters; blank values impose no constraint.
    pub fn from_params(
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        Self {
            first_name: TextFilter::from_param(first_name),
            last_name: TextFilter::from_param(last_name),
            email: TextFilter::from_param(email),
        }
    }

    /// In-memory evaluation, same semantics as the storage-side query
    /// (ASCII-only case folding, like SQLite `LOWER()`).
    pub fn matches(&self, c: &Customer) -> bool {
        let check = |f: &Option<TextFilter>, v: &Option<String>| {
            f.as_ref().map_or(true, |f| f.matches(v.as_deref()))
        };
        check(&self.first_name, &c.first_name)
            && check(&self.last_name, &c.last_name)
            && check(&self.email, &c.email)
    }
}

/// Rental record. `return_date == None` means the rental is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    pub rental_id: i32,
    pub rental_date: NaiveDateTime,
    pub inventory_id: i32,
    pub customer_id: i32,
    pub return_date: Option<NaiveDateTime>,
    pub staff_id: i32,
    pub last_update: NaiveDateTime,
}

impl Rental {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Data for opening a rental. References are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRental {
    pub inventory_id: i32,
    pub customer_id: i32,
    pub staff_id: i32,
}
