//! The four output styles over one stylesheet.

use scss::{CompileOptions, OutputStyle, compile};

const SOURCE: &str = r#"
$c: #336699;
/* banner */
nav {
  ul { margin: 0; padding: 0; }
  a {
    color: $c;
    &:hover { color: red; }
  }
}
@media print {
  nav { display: none; }
}
"#;

fn render(style: OutputStyle) -> String {
    compile(SOURCE, &CompileOptions::new().with_output_style(style)).unwrap()
}

#[test]
fn test_nested_style() {
    insta::assert_snapshot!(render(OutputStyle::Nested), @r"
/* banner */
nav ul {
  margin: 0;
  padding: 0; }

nav a {
  color: #336699; }
  nav a:hover {
    color: red; }

@media print {
  nav {
    display: none; } }
");
}

#[test]
fn test_expanded_style() {
    insta::assert_snapshot!(render(OutputStyle::Expanded), @r"
/* banner */
nav ul {
  margin: 0;
  padding: 0;
}

nav a {
  color: #336699;
}

nav a:hover {
  color: red;
}

@media print {
  nav {
    display: none;
  }
}
");
}

#[test]
fn test_compact_style() {
    insta::assert_snapshot!(render(OutputStyle::Compact), @r"
/* banner */
nav ul { margin: 0; padding: 0; }

nav a { color: #336699; }
nav a:hover { color: red; }

@media print { nav { display: none; } }
");
}

#[test]
fn test_compressed_style() {
    assert_eq!(
        render(OutputStyle::Compressed),
        "nav ul{margin:0;padding:0}nav a{color:#336699}nav a:hover{color:red}@media print{nav{display:none}}"
    );
}

#[test]
fn test_style_from_integer_and_name() {
    let by_number = OutputStyle::try_from(3).unwrap();
    let by_name: OutputStyle = "Compressed".parse().unwrap();
    assert_eq!(by_number, OutputStyle::Compressed);
    assert_eq!(by_name, OutputStyle::Compressed);
    assert!(OutputStyle::try_from(7).is_err());
    assert!("pretty".parse::<OutputStyle>().is_err());
}

#[test]
fn test_nested_is_the_default() {
    assert_eq!(OutputStyle::default(), OutputStyle::Nested);
    assert_eq!(
        compile(SOURCE, &CompileOptions::default()).unwrap(),
        render(OutputStyle::Nested)
    );
}
