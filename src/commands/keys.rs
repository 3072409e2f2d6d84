//! Keys command - list the filter kinds

use crate::filters::Registry;
use crate::output;

pub fn execute(quiet: bool) {
    if !quiet {
        println!("Filters (prefix with '!' to negate):");
    }
    for template in Registry::templates() {
        if quiet {
            println!("{}", template.key);
        } else {
            println!("{}", output::template_line(template));
        }
    }
}
