//! `roundtable scenarios` — list the built-in catalog.

use roundtable_core::scenario;

pub fn run() {
    println!();
    println!("  Available scenarios:");
    println!();
    for s in scenario::catalog() {
        println!("  {:<12} {}", s.id, s.title);
        println!("  {:<12} {}", "", s.description);
        println!();
    }
    println!("  Run one with: roundtable run --scenario <id>");
    println!();
}
