//! Row structs shared by the Diesel adapters.
//!
//! These stay private to the persistence layer; conversion to domain types
//! happens in the adapters.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    access_tokens, categories, confirm_email_tokens, contacts, order_items, orders, parameters,
    product_offers, product_parameters, products, shop_categories, shops, users,
};

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub company: &'a str,
    pub position: &'a str,
    pub account_type: &'a str,
    pub is_active: bool,
}

/// Subset used by login.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CredentialsRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub account_type: String,
    pub is_active: bool,
}

/// Subset rendered as the profile.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub position: String,
    pub account_type: String,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = confirm_email_tokens)]
pub struct NewConfirmEmailTokenRow {
    pub user_id: Uuid,
    pub token: Uuid,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = access_tokens)]
pub struct NewAccessTokenRow {
    pub user_id: Uuid,
    pub token: Uuid,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shops)]
pub struct NewShopRow<'a> {
    pub name: &'a str,
    pub user_id: Option<Uuid>,
    pub active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow<'a> {
    pub id: i32,
    pub name: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shop_categories)]
pub struct NewShopCategoryRow {
    pub shop_id: i32,
    pub category_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow<'a> {
    pub name: &'a str,
    pub category_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_offers)]
pub struct NewOfferRow<'a> {
    pub external_id: i64,
    pub model: &'a str,
    pub price: i64,
    pub price_rrc: i64,
    pub quantity: i32,
    pub shop_id: i32,
    pub product_id: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = parameters)]
pub struct NewParameterRow<'a> {
    pub name: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_parameters)]
pub struct NewProductParameterRow<'a> {
    pub offer_id: i64,
    pub parameter_id: i32,
    pub value: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contacts)]
pub struct NewContactRow<'a> {
    pub user_id: Uuid,
    pub city: &'a str,
    pub street: &'a str,
    pub house: &'a str,
    pub structure: &'a str,
    pub building: &'a str,
    pub apartment: &'a str,
    pub phone: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub user_id: Uuid,
    pub state: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i64,
    pub offer_id: i64,
    pub quantity: i32,
}
