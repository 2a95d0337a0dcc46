// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed catalogs of transaction categories and payment methods.
//!
//! Both are closed sets. A transaction stores the display name and icon
//! reference of its entry; reading a row maps the name back to the variant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Groceries,
    Transport,
    Flights,
    Accommodation,
    Sightseeing,
    Activities,
    Entertainment,
    Shopping,
    Health,
    Fees,
    Other,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Food,
        Category::Groceries,
        Category::Transport,
        Category::Flights,
        Category::Accommodation,
        Category::Sightseeing,
        Category::Activities,
        Category::Entertainment,
        Category::Shopping,
        Category::Health,
        Category::Fees,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food & Drinks",
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::Flights => "Flights",
            Category::Accommodation => "Accommodation",
            Category::Sightseeing => "Sightseeing",
            Category::Activities => "Activities",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Fees => "Fees & Charges",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "ic_category_food",
            Category::Groceries => "ic_category_groceries",
            Category::Transport => "ic_category_transport",
            Category::Flights => "ic_category_flight",
            Category::Accommodation => "ic_category_hotel",
            Category::Sightseeing => "ic_category_sightseeing",
            Category::Activities => "ic_category_activities",
            Category::Entertainment => "ic_category_entertainment",
            Category::Shopping => "ic_category_shopping",
            Category::Health => "ic_category_health",
            Category::Fees => "ic_category_fees",
            Category::Other => "ic_category_other",
        }
    }

    /// Short stable key used on the command line and in navigation.
    pub fn route(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Groceries => "groceries",
            Category::Transport => "transport",
            Category::Flights => "flights",
            Category::Accommodation => "accommodation",
            Category::Sightseeing => "sightseeing",
            Category::Activities => "activities",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Fees => "fees",
            Category::Other => "other",
        }
    }

    pub fn from_route(route: &str) -> Option<Category> {
        let route = route.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.route().eq_ignore_ascii_case(route))
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    MobileWallet,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::MobileWallet,
        PaymentMethod::BankTransfer,
        PaymentMethod::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::MobileWallet => "Mobile Wallet",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "ic_payment_cash",
            PaymentMethod::CreditCard => "ic_payment_credit_card",
            PaymentMethod::DebitCard => "ic_payment_debit_card",
            PaymentMethod::MobileWallet => "ic_payment_wallet",
            PaymentMethod::BankTransfer => "ic_payment_bank",
            PaymentMethod::Other => "ic_payment_other",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::MobileWallet => "mobile_wallet",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }

    pub fn from_route(route: &str) -> Option<PaymentMethod> {
        let route = route.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.route().eq_ignore_ascii_case(route))
    }

    pub fn from_name(name: &str) -> Option<PaymentMethod> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}
