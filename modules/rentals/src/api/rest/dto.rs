use apikit::ValidationError;
use chrono::NaiveDateTime;
use query_core::Page;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{Customer, CustomerPatch, NewCustomer, NewRental, Rental};

/// Wire format for timestamps: `YYYY-MM-DD HH:MM:SS`.
pub mod ts {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(v: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&v.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    /// Same format, `null` when absent.
    pub mod option {
        use super::FORMAT;
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            v: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match v {
                Some(v) => s.collect_str(&v.format(FORMAT)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| NaiveDateTime::parse_from_str(&raw, FORMAT))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

fn ok() -> String {
    "ok".to_owned()
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// `active` as sent by clients: a JSON boolean or `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ActiveFlag {
    Bool(bool),
    Int(i64),
}

impl ActiveFlag {
    fn to_bool(self) -> Result<bool, ValidationError> {
        match self {
            ActiveFlag::Bool(b) => Ok(b),
            ActiveFlag::Int(0) => Ok(false),
            ActiveFlag::Int(1) => Ok(true),
            ActiveFlag::Int(n) => Err(ValidationError::new(
                "/active",
                format!("must be a boolean or 0/1 (got {n})"),
            )),
        }
    }
}

fn parse_object(body: &[u8]) -> Result<serde_json::Map<String, serde_json::Value>, Vec<ValidationError>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(vec![ValidationError::new("", "a JSON body is required")]);
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| vec![ValidationError::new("", format!("malformed JSON: {e}"))])?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(vec![ValidationError::new("", "the JSON body must be an object")]),
    }
}

fn from_object<T: DeserializeOwned>(
    map: serde_json::Map<String, serde_json::Value>,
) -> Result<T, Vec<ValidationError>> {
    serde_json::from_value(serde_json::Value::Object(map))
        .map_err(|e| vec![ValidationError::new("", e.to_string())])
}

/// Parse a request body that must be a JSON object.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Vec<ValidationError>> {
    parse_object(body).and_then(from_object)
}

/// Like [`parse_body`], but `{}` is rejected. A key with a `null` value
/// still counts as a field.
pub fn parse_fields<T: DeserializeOwned>(body: &[u8]) -> Result<T, Vec<ValidationError>> {
    let map = parse_object(body)?;
    if map.is_empty() {
        return Err(vec![ValidationError::new(
            "",
            "at least one customer field is required",
        )]);
    }
    from_object(map)
}

/// REST DTO for customer representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub customer_id: i32,
    pub store_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i32>,
    pub active: bool,
    #[serde(with = "ts")]
    #[schema(value_type = String, example = "2024-05-01 10:00:00")]
    pub create_date: NaiveDateTime,
    #[serde(with = "ts")]
    #[schema(value_type = String, example = "2024-05-01 10:00:00")]
    pub last_update: NaiveDateTime,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            customer_id: c.customer_id,
            store_id: c.store_id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            address_id: c.address_id,
            active: c.active,
            create_date: c.create_date,
            last_update: c.last_update,
        }
    }
}

/// REST DTO for rental representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RentalDto {
    pub rental_id: i32,
    #[serde(with = "ts")]
    #[schema(value_type = String, example = "2024-05-01 10:00:00")]
    pub rental_date: NaiveDateTime,
    pub inventory_id: i32,
    pub customer_id: i32,
    #[serde(with = "ts::option")]
    #[schema(value_type = Option<String>, example = "2024-05-03 18:30:00")]
    pub return_date: Option<NaiveDateTime>,
    pub staff_id: i32,
    #[serde(with = "ts")]
    #[schema(value_type = String, example = "2024-05-01 10:00:00")]
    pub last_update: NaiveDateTime,
}

impl From<Rental> for RentalDto {
    fn from(r: Rental) -> Self {
        Self {
            rental_id: r.rental_id,
            rental_date: r.rental_date,
            inventory_id: r.inventory_id,
            customer_id: r.customer_id,
            return_date: r.return_date,
            staff_id: r.staff_id,
            last_update: r.last_update,
        }
    }
}

/// REST DTO for creating a customer; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerReq {
    pub store_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i32>,
    pub active: Option<ActiveFlag>,
}

impl TryFrom<CreateCustomerReq> for NewCustomer {
    type Error = Vec<ValidationError>;

    fn try_from(req: CreateCustomerReq) -> Result<Self, Self::Error> {
        let active = req
            .active
            .map(ActiveFlag::to_bool)
            .transpose()
            .map_err(|e| vec![e])?;
        Ok(Self {
            store_id: req.store_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            address_id: req.address_id,
            active,
        })
    }
}

/// REST DTO for updating a customer. Omitted fields are kept; `null` clears
/// a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerReq {
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub store_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub address_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<ActiveFlag>)]
    pub active: Option<Option<ActiveFlag>>,
}

impl TryFrom<UpdateCustomerReq> for CustomerPatch {
    type Error = Vec<ValidationError>;

    fn try_from(req: UpdateCustomerReq) -> Result<Self, Self::Error> {
        let active = match req.active {
            None => None,
            Some(None) => {
                return Err(vec![ValidationError::new("/active", "cannot be null")]);
            }
            Some(Some(flag)) => Some(flag.to_bool().map_err(|e| vec![e])?),
        };
        Ok(Self {
            store_id: req.store_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            address_id: req.address_id,
            active,
        })
    }
}

/// REST DTO for opening a rental; all three references are required
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OpenRentalReq {
    pub inventory_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub staff_id: Option<i32>,
}

impl TryFrom<OpenRentalReq> for NewRental {
    type Error = Vec<ValidationError>;

    fn try_from(req: OpenRentalReq) -> Result<Self, Self::Error> {
        match (req.inventory_id, req.customer_id, req.staff_id) {
            (Some(inventory_id), Some(customer_id), Some(staff_id)) => Ok(Self {
                inventory_id,
                customer_id,
                staff_id,
            }),
            (i, c, s) => Err([("inventory_id", i), ("customer_id", c), ("staff_id", s)]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| ValidationError::new(format!("/{name}"), "is required"))
                .collect()),
        }
    }
}

/// Query parameters for `GET /customers`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersQuery {
    /// Page size (default 700); 0 returns no rows.
    pub limit: Option<i64>,
    /// Rows to skip (default 0).
    pub offset: Option<i64>,
    /// Case-insensitive substring of `first_name`.
    pub first_name: Option<String>,
    /// Case-insensitive substring of `last_name`.
    pub last_name: Option<String>,
    /// Case-insensitive substring of `email`.
    pub email: Option<String>,
}

/// Query parameters for `GET /rentals`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRentalsQuery {
    /// Page size (default 50); 0 returns no rows.
    pub limit: Option<i64>,
    /// Rows to skip (default 0).
    pub offset: Option<i64>,
}

// Response envelopes. Every success body carries `"status": "ok"`.

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResp {
    pub status: String,
    pub message: String,
}

impl MessageResp {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ok(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerCreatedResp {
    pub status: String,
    pub message: String,
    pub customer_id: i32,
}

impl CustomerCreatedResp {
    pub fn new(customer_id: i32) -> Self {
        Self {
            status: ok(),
            message: "Customer created".to_owned(),
            customer_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResp {
    pub status: String,
    pub customer: CustomerDto,
}

impl From<Customer> for CustomerResp {
    fn from(c: Customer) -> Self {
        Self {
            status: ok(),
            customer: c.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerListResp {
    pub status: String,
    /// Rows in this response.
    pub count: usize,
    /// Rows matching the filters.
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub customers: Vec<CustomerDto>,
}

impl From<Page<Customer>> for CustomerListResp {
    fn from(page: Page<Customer>) -> Self {
        let page = page.map_items(CustomerDto::from);
        Self {
            status: ok(),
            count: page.count(),
            total: page.page_info.total,
            limit: page.page_info.limit,
            offset: page.page_info.offset,
            customers: page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalCreatedResp {
    pub status: String,
    pub message: String,
    pub rental_id: i32,
}

impl RentalCreatedResp {
    pub fn new(rental_id: i32) -> Self {
        Self {
            status: ok(),
            message: "Rental created".to_owned(),
            rental_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalResp {
    pub status: String,
    pub rental: RentalDto,
}

impl From<Rental> for RentalResp {
    fn from(r: Rental) -> Self {
        Self {
            status: ok(),
            rental: r.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalReturnedResp {
    pub status: String,
    pub message: String,
    pub rental: RentalDto,
}

impl From<Rental> for RentalReturnedResp {
    fn from(r: Rental) -> Self {
        Self {
            status: ok(),
            message: format!("Rental {} returned", r.rental_id),
            rental: r.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerRentalsResp {
    pub status: String,
    pub count: usize,
    pub rentals: Vec<RentalDto>,
}

impl From<Vec<Rental>> for CustomerRentalsResp {
    fn from(rentals: Vec<Rental>) -> Self {
        Self {
            status: ok(),
            count: rentals.len(),
            rentals: rentals.into_iter().map(RentalDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalListResp {
    pub status: String,
    pub count: usize,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub rentals: Vec<RentalDto>,
}

impl From<Page<Rental>> for RentalListResp {
    fn from(page: Page<Rental>) -> Self {
        let page = page.map_items(RentalDto::from);
        Self {
            status: ok(),
            count: page.count(),
            total: page.page_info.total,
            limit: page.page_info.limit,
            offset: page.page_info.offset,
            rentals: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, 5, 9)
            .unwrap()
    }

    #[test]
    fn rental_timestamps_use_wire_format_and_null() {
        let dto = RentalDto::from(Rental {
            rental_id: 3,
            rental_date: at(10),
            inventory_id: 1,
            customer_id: 2,
            return_date: None,
            staff_id: 1,
            last_update: at(10),
        });
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["rental_date"], "2024-05-01 10:05:09");
        assert!(v["return_date"].is_null());

        let back: RentalDto = serde_json::from_value(v).unwrap();
        assert_eq!(back, dto);
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let req: UpdateCustomerReq =
            parse_body(br#"{"email": null, "first_name": "Mary"}"#).unwrap();
        let patch = CustomerPatch::try_from(req).unwrap();
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.first_name, Some(Some("Mary".into())));
        assert_eq!(patch.last_name, None);
        assert_eq!(patch.active, None);
    }

    #[test]
    fn active_accepts_bool_and_zero_one() {
        for (raw, expected) in [("true", true), ("false", false), ("0", false), ("1", true)] {
            let body = format!(r#"{{"active": {raw}}}"#);
            let req: CreateCustomerReq = parse_body(body.as_bytes()).unwrap();
            let new = NewCustomer::try_from(req).unwrap();
            assert_eq!(new.active, Some(expected), "active = {raw}");
        }

        let req: CreateCustomerReq = parse_body(br#"{"active": 2}"#).unwrap();
        let errs = NewCustomer::try_from(req).unwrap_err();
        assert_eq!(errs[0].pointer, "/active");

        let req: UpdateCustomerReq = parse_body(br#"{"active": null}"#).unwrap();
        assert!(CustomerPatch::try_from(req).is_err());
    }

    #[test]
    fn open_rental_reports_every_missing_reference() {
        let req: OpenRentalReq = parse_body(br#"{"customer_id": 4}"#).unwrap();
        let errs = NewRental::try_from(req).unwrap_err();
        let pointers: Vec<_> = errs.iter().map(|e| e.pointer.as_str()).collect();
        assert_eq!(pointers, ["/inventory_id", "/staff_id"]);
    }

    #[test]
    fn body_must_be_a_json_object() {
        assert!(parse_body::<OpenRentalReq>(b"").is_err());
        assert!(parse_body::<OpenRentalReq>(b"  \n").is_err());
        assert!(parse_body::<OpenRentalReq>(b"null").is_err());
        assert!(parse_body::<OpenRentalReq>(b"[1,2,3]").is_err());
        assert!(parse_body::<OpenRentalReq>(b"{not json").is_err());
        assert!(parse_body::<OpenRentalReq>(br#"{"staff_id": "x"}"#).is_err());
        assert!(parse_body::<OpenRentalReq>(b"{}").is_ok());
    }

    #[test]
    fn customer_fields_may_be_null_but_not_absent() {
        let errs = parse_fields::<CreateCustomerReq>(b"{}").unwrap_err();
        assert_eq!(errs[0].detail, "at least one customer field is required");

        let req: CreateCustomerReq = parse_fields(br#"{"first_name": null}"#).unwrap();
        let new = NewCustomer::try_from(req).unwrap();
        assert_eq!(new, NewCustomer::default());

        let req: UpdateCustomerReq = parse_fields(br#"{"email": null}"#).unwrap();
        assert_eq!(CustomerPatch::try_from(req).unwrap().email, Some(None));
    }
}
