// Hand-maintained to match migrations/2026-08-23-000000_create_tracking_tables.

diesel::table! {
    locations (id) {
        id -> Integer,
        description -> Text,
    }
}

diesel::table! {
    customers (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    packages (id) {
        id -> Integer,
        tracking_code -> Text,
        customer_id -> Integer,
    }
}

diesel::table! {
    events (id) {
        id -> Integer,
        timestamp -> Text,
        package_id -> Integer,
        location_id -> Integer,
        description -> Text,
    }
}

diesel::joinable!(packages -> customers (customer_id));
diesel::joinable!(events -> packages (package_id));
diesel::joinable!(events -> locations (location_id));

diesel::allow_tables_to_appear_in_same_query!(locations, customers, packages, events,);
