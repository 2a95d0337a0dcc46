// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::{Category, PaymentMethod};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle() -> Result<()> {
    let cats = Category::ALL
        .iter()
        .map(|c| vec![c.route().to_string(), c.name().to_string(), c.icon().to_string()])
        .collect();
    println!("{}", pretty_table(&["Category", "Name", "Icon"], cats));

    let methods = PaymentMethod::ALL
        .iter()
        .map(|p| vec![p.route().to_string(), p.name().to_string(), p.icon().to_string()])
        .collect();
    println!("{}", pretty_table(&["Payment", "Name", "Icon"], methods));
    Ok(())
}
