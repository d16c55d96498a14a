//! Reference-data models backing the form-choices bundle.
//!
//! These rows are managed by external CRUD tooling; this service only reads
//! them to populate choice lists and resolve foreign keys.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Currency from currencies
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Currency {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// City from cities
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
}

/// Vehicle type from vehicle_types
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleType {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
}

/// Buyer company from buyer_companies
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuyerCompany {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
}

/// Vehicle-based tour route from tours
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tour {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
}

/// Walking tour from no_vehicle_tours
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NoVehicleTour {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
}

/// Transfer route from transfers
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transfer {
    pub id: Uuid,
    pub name: String,
    pub start_city_id: Uuid,
    pub end_city_id: Uuid,
}

/// Activity from activities
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
}

/// Guide from guides
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guide {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub document_no: Option<String>,
}

/// Vehicle supplier from vehicle_suppliers
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleSupplier {
    pub id: Uuid,
    pub name: String,
}

/// Activity supplier from activity_suppliers
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivitySupplier {
    pub id: Uuid,
    pub name: String,
}

/// Dropdown sources for the office forms, loaded and cached as one bundle
#[derive(Debug, Clone, Serialize)]
pub struct FormChoices {
    pub currencies: Vec<Currency>,
    pub cities: Vec<City>,
    pub vehicle_types: Vec<VehicleType>,
    pub buyer_companies: Vec<BuyerCompany>,
    pub tours: Vec<Tour>,
    pub no_vehicle_tours: Vec<NoVehicleTour>,
    pub transfers: Vec<Transfer>,
    pub activities: Vec<Activity>,
    pub guides: Vec<Guide>,
    pub vehicle_suppliers: Vec<VehicleSupplier>,
    pub activity_suppliers: Vec<ActivitySupplier>,
    pub hotels: Vec<super::catalog::Hotel>,
    pub museums: Vec<super::catalog::Museum>,
}
