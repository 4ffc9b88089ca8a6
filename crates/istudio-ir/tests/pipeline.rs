//! Source-to-IR pipeline smoke test.

use istudio_front::{lex, parse_module, AstContext, LexerConfig};
use istudio_ir::{lower_module, print_module};
use istudio_sem::analyze_module;

const MATH_BASICS: &str = "module math_basics;

fn add(a, b) {
  return a + b;
}

fn triple(value) {
  let doubled = add(value, value);
  return doubled + value;
}

triple(add(1, 2));
";

#[test]
fn math_basics_lowers_end_to_end() {
    let mut context = AstContext::new();
    let tokens = lex(MATH_BASICS, LexerConfig::default());
    let root = parse_module(&tokens, &mut context).unwrap();

    let module_name = context.node(root).value.clone();
    assert_eq!(module_name, "math_basics");

    let analysis = analyze_module(&context, root).unwrap();
    assert!(
        !analysis.has_errors(),
        "unexpected diagnostics: {:?}",
        analysis.diagnostics
    );

    let module = lower_module(&context, &analysis, module_name).unwrap();
    assert_eq!(module.functions().len(), 2);

    let printed = print_module(&module);
    assert!(printed.contains("function add {"));
    assert!(printed.contains("  t0 = add a, b;"));
    assert!(printed.contains("  ret t0;"));
    assert!(printed.contains("function triple {"));
    assert!(printed.contains("  doubled = call add, value, value;"));
}
