//! Built-in accounts and catalog used to populate an empty profile.

use crate::models::{Account, Product, Role};

pub fn accounts() -> Vec<Account> {
    vec![
        account("admin-1", "admin@skincare.com", "admin123", "Admin User", Role::Admin, None),
        account(
            "vendor-1",
            "vendor@mamaearth.com",
            "vendor123",
            "Mamaearth Vendor",
            Role::Vendor,
            Some("Mamaearth"),
        ),
        account(
            "vendor-2",
            "vendor@minimalist.com",
            "vendor123",
            "Minimalist Vendor",
            Role::Vendor,
            Some("Minimalist"),
        ),
        account(
            "customer-1",
            "customer@example.com",
            "customer123",
            "John Doe",
            Role::Customer,
            None,
        ),
    ]
}

fn account(
    id: &str,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
    vendor_brand: Option<&str>,
) -> Account {
    Account {
        id: id.into(),
        email: email.into(),
        password: password.into(),
        name: name.into(),
        role,
        vendor_brand: vendor_brand.map(Into::into),
    }
}

pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: "prod-1".into(),
            name: "Vitamin C Face Wash".into(),
            brand: "Mamaearth".into(),
            category: "Face Care".into(),
            price: 249.0,
            original_price: Some(299.0),
            discount: Some(17),
            rating: 4.5,
            reviews: 2453,
            image: "/mamaearth-vitamin-c-face-wash.jpg".into(),
            description: "A gentle daily cleanser enriched with Vitamin C to brighten and cleanse your skin.".into(),
            ingredients: "Vitamin C, Turmeric, Aloe Vera, Glycerin".into(),
            how_to_use: "Wet your face, apply a small amount, massage gently, and rinse with water.".into(),
            vendor_id: Some("vendor-1".into()),
            in_stock: true,
        },
        Product {
            id: "prod-2".into(),
            name: "Salicylic Acid Serum 2%".into(),
            brand: "Minimalist".into(),
            category: "Acne Care".into(),
            price: 599.0,
            original_price: Some(699.0),
            discount: Some(14),
            rating: 4.7,
            reviews: 1876,
            image: "/minimalist-salicylic-acid-serum.jpg".into(),
            description: "Targets acne and blemishes with 2% Salicylic Acid for clearer skin.".into(),
            ingredients: "Salicylic Acid 2%, Hyaluronic Acid, Zinc PCA".into(),
            how_to_use: "Apply 2-3 drops on clean skin. Use once daily in the evening.".into(),
            vendor_id: Some("vendor-2".into()),
            in_stock: true,
        },
        Product {
            id: "prod-3".into(),
            name: "Onion Hair Oil".into(),
            brand: "WOW".into(),
            category: "Hair Care".into(),
            price: 499.0,
            original_price: Some(599.0),
            discount: Some(17),
            rating: 4.3,
            reviews: 3421,
            image: "/wow-onion-hair-oil.jpg".into(),
            description: "Enriched with onion seed oil to promote hair growth and reduce hair fall.".into(),
            ingredients: "Onion Seed Oil, Coconut Oil, Almond Oil, Castor Oil".into(),
            how_to_use: "Massage onto scalp and hair. Leave for 1-2 hours or overnight, then wash.".into(),
            vendor_id: None,
            in_stock: true,
        },
        Product {
            id: "prod-4".into(),
            name: "Green Tea Moisturizer".into(),
            brand: "Plum".into(),
            category: "Face Care".into(),
            price: 470.0,
            original_price: Some(550.0),
            discount: Some(15),
            rating: 4.6,
            reviews: 1654,
            image: "/plum-green-tea-moisturizer.jpg".into(),
            description: "Lightweight gel moisturizer with green tea for oil control and hydration.".into(),
            ingredients: "Green Tea Extract, Glycerin, Mandelic Acid".into(),
            how_to_use: "Apply a small amount on cleansed face morning and evening.".into(),
            vendor_id: None,
            in_stock: true,
        },
        Product {
            id: "prod-5".into(),
            name: "9 to 5 Vitamin C Sunscreen SPF 50".into(),
            brand: "Lakme".into(),
            category: "Sun Care".into(),
            price: 399.0,
            original_price: Some(450.0),
            discount: Some(11),
            rating: 4.4,
            reviews: 2156,
            image: "/lakme-sunscreen-spf-50.jpg".into(),
            description: "Broad spectrum SPF 50 sunscreen with Vitamin C for sun protection.".into(),
            ingredients: "Vitamin C, Zinc Oxide, Titanium Dioxide".into(),
            how_to_use: "Apply generously 15 minutes before sun exposure. Reapply every 2 hours.".into(),
            vendor_id: None,
            in_stock: true,
        },
    ]
}
