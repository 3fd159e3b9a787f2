//! Diesel table definitions matching the embedded migrations.

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 150]
        username -> Varchar,
        #[max_length = 150]
        first_name -> Varchar,
        #[max_length = 150]
        last_name -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 256]
        password_hash -> Varchar,
        #[max_length = 150]
        company -> Varchar,
        #[max_length = 150]
        position -> Varchar,
        #[max_length = 10]
        account_type -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    confirm_email_tokens (id) {
        id -> Int8,
        user_id -> Uuid,
        token -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    access_tokens (id) {
        id -> Int8,
        user_id -> Uuid,
        token -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    shops (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        user_id -> Nullable<Uuid>,
        active -> Bool,
    }
}

diesel::table! {
    categories (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    shop_categories (shop_id, category_id) {
        shop_id -> Int4,
        category_id -> Int4,
    }
}

diesel::table! {
    products (id) {
        id -> Int8,
        #[max_length = 200]
        name -> Varchar,
        category_id -> Int4,
    }
}

diesel::table! {
    product_offers (id) {
        id -> Int8,
        external_id -> Int8,
        #[max_length = 100]
        model -> Varchar,
        price -> Int8,
        price_rrc -> Int8,
        quantity -> Int4,
        shop_id -> Int4,
        product_id -> Int8,
    }
}

diesel::table! {
    parameters (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    product_parameters (offer_id, parameter_id) {
        offer_id -> Int8,
        parameter_id -> Int4,
        #[max_length = 200]
        value -> Varchar,
    }
}

diesel::table! {
    contacts (id) {
        id -> Int8,
        user_id -> Uuid,
        #[max_length = 100]
        city -> Varchar,
        #[max_length = 150]
        street -> Varchar,
        #[max_length = 30]
        house -> Varchar,
        #[max_length = 30]
        structure -> Varchar,
        #[max_length = 30]
        building -> Varchar,
        #[max_length = 30]
        apartment -> Varchar,
        #[max_length = 30]
        phone -> Varchar,
    }
}

diesel::table! {
    orders (id) {
        id -> Int8,
        user_id -> Uuid,
        #[max_length = 20]
        state -> Varchar,
        contact_id -> Nullable<Int8>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    order_items (id) {
        id -> Int8,
        order_id -> Int8,
        offer_id -> Int8,
        quantity -> Int4,
    }
}

diesel::joinable!(confirm_email_tokens -> users (user_id));
diesel::joinable!(access_tokens -> users (user_id));
diesel::joinable!(shops -> users (user_id));
diesel::joinable!(shop_categories -> shops (shop_id));
diesel::joinable!(shop_categories -> categories (category_id));
diesel::joinable!(products -> categories (category_id));
diesel::joinable!(product_offers -> shops (shop_id));
diesel::joinable!(product_offers -> products (product_id));
diesel::joinable!(product_parameters -> product_offers (offer_id));
diesel::joinable!(product_parameters -> parameters (parameter_id));
diesel::joinable!(contacts -> users (user_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(orders -> contacts (contact_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> product_offers (offer_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    confirm_email_tokens,
    access_tokens,
    shops,
    categories,
    shop_categories,
    products,
    product_offers,
    parameters,
    product_parameters,
    contacts,
    orders,
    order_items,
);
