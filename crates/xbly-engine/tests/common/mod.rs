// Helpers shared by the integration tests - Rust's dead code analysis
// doesn't see that each test binary uses a different subset of them.

use xbly_engine::{Element, Node};

/// Structure of an XML element as the tests compare it: formatting of the
/// markup is ignored, names, attributes, text and child order are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Shape>,
    },
    Text(String),
}

/// Parse XML text and return the shape of its root element.
#[allow(dead_code)]
pub fn shape_of_xml(xml: &str) -> Shape {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options)
        .unwrap_or_else(|e| panic!("not well-formed XML ({e}):\n{xml}"));
    xml_element(document.root_element())
}

fn xml_element(node: roxmltree::Node<'_, '_>) -> Shape {
    let mut attributes: Vec<_> = node
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();
    attributes.sort();

    let children = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                Some(xml_element(child))
            } else if child.is_text() {
                Some(Shape::Text(child.text().unwrap_or_default().to_string()))
            } else {
                None
            }
        })
        .collect();

    Shape::Element {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
    }
}

/// Shape of a lowered element, for comparison with what an XML parser sees.
///
/// Namespace declarations are not attributes to an XML parser, so they are
/// left out here too.
#[allow(dead_code)]
pub fn shape_of_element(element: &Element) -> Shape {
    let mut attributes: Vec<_> = element
        .attributes
        .iter()
        .filter(|(name, _)| name != "xmlns" && !name.starts_with("xmlns:"))
        .cloned()
        .collect();
    attributes.sort();

    let children = element
        .children
        .iter()
        .map(|child| match child {
            Node::Element(child) => shape_of_element(child),
            Node::Text(text) => Shape::Text(text.clone()),
        })
        .collect();

    Shape::Element {
        name: element.name.clone(),
        attributes,
        children,
    }
}

#[allow(dead_code)]
pub fn fixture_path(file: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(file)
}
