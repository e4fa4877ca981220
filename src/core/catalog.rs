use crate::domain::model::{CartLine, CartQuote, Product};
use crate::utils::error::{AppError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// 滿額免運門檻 (INR)
pub const FREE_DELIVERY_THRESHOLD: u64 = 500;
pub const DELIVERY_CHARGE: u64 = 40;

macro_rules! pexels_image {
    ($path:literal) => {
        concat!("https://images.pexels.com/photos/", $path, "?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1")
    };
}

pub static PRODUCTS: &[Product] = &[
    Product {
        id: 1,
        name: "Fresh Tomatoes",
        image: pexels_image!("1327838/pexels-photo-1327838.jpeg"),
        price: 40,
        unit: "kg",
        description: "Premium quality, vine-ripened red tomatoes. Fresh, juicy, and perfect for daily cooking.",
        stock: 100,
    },
    Product {
        id: 2,
        name: "Premium Basmati Rice",
        image: pexels_image!("2686809/pexels-photo-2686809.jpeg"),
        price: 75,
        unit: "kg",
        description: "High-quality basmati rice with long grains, aromatic flavor, and perfect texture when cooked.",
        stock: 500,
    },
    Product {
        id: 3,
        name: "Fresh Green Chilies",
        image: pexels_image!("4110456/pexels-photo-4110456.jpeg"),
        price: 30,
        unit: "250g",
        description: "Farm-fresh green chilies with the perfect balance of heat and flavor. Ideal for all Indian dishes.",
        stock: 50,
    },
    Product {
        id: 4,
        name: "Farm-Fresh Potatoes",
        image: pexels_image!("144248/potatoes-vegetables-erdfrucht-bio-144248.jpeg"),
        price: 25,
        unit: "kg",
        description: "Premium quality potatoes, freshly harvested. Clean, uniform size, and perfect for all cooking needs.",
        stock: 200,
    },
    Product {
        id: 5,
        name: "Fresh Red Onions",
        image: pexels_image!("135529/pexels-photo-135529.jpeg"),
        price: 35,
        unit: "kg",
        description: "Crisp red onions, essential for salads, curries, and various culinary uses.",
        stock: 150,
    },
    Product {
        id: 6,
        name: "Ripe Bananas",
        image: pexels_image!("1093038/pexels-photo-1093038.jpeg"),
        price: 50,
        unit: "dozen",
        description: "Naturally ripened bananas, perfect for a quick energy boost or adding to smoothies.",
        stock: 80,
    },
    Product {
        id: 7,
        name: "Crisp Apples",
        image: pexels_image!("102104/pexels-photo-102104.jpeg"),
        price: 120,
        unit: "kg",
        description: "Sweet and crunchy apples, great for snacking or baking.",
        stock: 90,
    },
];

/// 用戶端購物車：商品 id -> 數量
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
}

pub fn find_product(id: u32) -> Option<&'static Product> {
    PRODUCTS.iter().find(|product| product.id == id)
}

pub fn delivery_charge(subtotal: u64) -> u64 {
    if subtotal >= FREE_DELIVERY_THRESHOLD {
        0
    } else {
        DELIVERY_CHARGE
    }
}

pub fn quote_cart(cart: &CartRequest) -> Result<CartQuote> {
    if cart.items.is_empty() {
        return Err(AppError::invalid_input("Cart is empty"));
    }

    let mut lines = Vec::with_capacity(cart.items.len());
    for (raw_id, &quantity) in &cart.items {
        let product = raw_id
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(find_product)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown product: {raw_id}")))?;

        if quantity == 0 {
            return Err(AppError::invalid_input(format!(
                "Quantity for {} must be at least 1",
                product.name
            )));
        }
        if quantity > product.stock {
            return Err(AppError::invalid_input(format!(
                "Only {} {} of {} in stock",
                product.stock, product.unit, product.name
            )));
        }

        lines.push(CartLine {
            id: product.id,
            name: product.name,
            unit: product.unit,
            price: product.price,
            quantity,
            line_total: product.price * u64::from(quantity),
        });
    }
    lines.sort_by_key(|line| line.id);

    let subtotal = lines.iter().map(|line| line.line_total).sum();
    let delivery_charge = delivery_charge(subtotal);
    Ok(CartQuote {
        lines,
        subtotal,
        delivery_charge,
        total: subtotal + delivery_charge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart(items: &[(&str, u32)]) -> CartRequest {
        CartRequest {
            items: items.iter().map(|(id, qty)| (id.to_string(), *qty)).collect(),
        }
    }

    #[test]
    fn test_catalog_has_seven_products() {
        assert_eq!(PRODUCTS.len(), 7);
        assert_eq!(find_product(3).unwrap().unit, "250g");
        assert!(find_product(8).is_none());
        assert!(PRODUCTS[0].image.ends_with("&w=1260&h=750&dpr=1"));
    }

    #[test]
    fn test_small_order_pays_delivery() {
        let quote = quote_cart(&cart(&[("1", 2), ("3", 1)])).unwrap();
        assert_eq!(quote.subtotal, 110);
        assert_eq!(quote.delivery_charge, 40);
        assert_eq!(quote.total, 150);
        assert_eq!(quote.lines[1].line_total, 30);
    }

    #[test]
    fn test_free_delivery_at_threshold() {
        // 4 kg 蘋果 + 2 打香蕉 = 580
        let quote = quote_cart(&cart(&[("7", 4), ("6", 2)])).unwrap();
        assert_eq!(quote.subtotal, 580);
        assert_eq!(quote.delivery_charge, 0);
        assert_eq!(quote.lines[0].id, 6);

        assert_eq!(delivery_charge(500), 0);
        assert_eq!(delivery_charge(499), 40);
    }

    #[test]
    fn test_rejects_unknown_and_overstock() {
        let err = quote_cart(&cart(&[("42", 1)])).unwrap_err();
        assert_eq!(err.to_string(), "Unknown product: 42");

        let err = quote_cart(&cart(&[("3", 51)])).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("Fresh Green Chilies"));

        assert!(quote_cart(&cart(&[])).is_err());
    }
}
