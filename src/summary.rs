// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spend and budget aggregates for one trip.
//!
//! Pure functions over a transaction list. Missing optional trip fields are
//! treated as unset; nothing here fails. Sums saturate at `Decimal::MAX`
//! instead of overflowing.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::Category;
use crate::models::{Transaction, TransactionType, Trip};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripTotals {
    /// EXPENSE amounts not excluded from the budget
    pub total_spend: Decimal,
    /// All INCOME amounts
    pub total_income: Decimal,
    /// `total_budget - total_spend`, only when a total budget is set
    pub budget_remaining: Option<Decimal>,
    pub daily_budget: Option<Decimal>,
    pub transaction_count: usize,
    /// Budgeted spend per category, catalog order, zero entries omitted
    pub spend_by_category: Vec<(Category, Decimal)>,
}

impl TripTotals {
    pub fn compute(trip: Option<&Trip>, transactions: &[Transaction]) -> Self {
        let mut total_spend = Decimal::ZERO;
        let mut total_income = Decimal::ZERO;
        let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();

        for tx in transactions {
            match tx.r#type {
                TransactionType::Income => total_income = total_income.saturating_add(tx.amount),
                TransactionType::Expense if !tx.exclude_from_budget => {
                    total_spend = total_spend.saturating_add(tx.amount);
                    let slot = by_category.entry(tx.category).or_insert(Decimal::ZERO);
                    *slot = slot.saturating_add(tx.amount);
                }
                TransactionType::Expense => {}
            }
        }

        let budget_remaining = trip
            .and_then(|t| t.total_budget)
            .map(|budget| budget.saturating_sub(total_spend));

        Self {
            total_spend,
            total_income,
            budget_remaining,
            daily_budget: trip.and_then(|t| t.daily_budget),
            transaction_count: transactions.len(),
            spend_by_category: by_category
                .into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .collect(),
        }
    }

    /// Fraction of the total budget already spent, if a positive budget is set.
    pub fn budget_used_ratio(&self) -> Option<Decimal> {
        let budget = self.budget_remaining?.checked_add(self.total_spend)?;
        if budget <= Decimal::ZERO {
            return None;
        }
        self.total_spend.checked_div(budget)
    }
}

pub fn total_spend(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.is_budgeted_expense())
        .fold(Decimal::ZERO, |acc, tx| acc.saturating_add(tx.amount))
}
