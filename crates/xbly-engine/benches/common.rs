// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_basket(items: usize) -> String {
    let mut source = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n(basket\n");
    for i in 0..items {
        source.push_str(&format!(
            "    (item \\quantity=\"{}\" Item number {i} \\(fresh\\))\n",
            i % 7
        ));
    }
    source.push_str(")\n");
    source
}

#[allow(dead_code)]
pub fn generate_nested(depth: usize) -> String {
    let mut source = String::new();
    for level in 0..depth {
        source.push_str(&format!("(level \\depth=\"{level}\" text "));
    }
    source.push_str(&")".repeat(depth));
    source
}
