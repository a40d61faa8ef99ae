//! Selector path specificity.
//!
//! The weight is a count-based approximation of the CSS3 a-b-c formula:
//! 100 per attribute clause or pseudo-class entry anywhere in the path,
//! plus 1 for the path itself. ID selectors and element-type/pseudo-element
//! occurrences are deliberately not counted separately; consumers relying
//! on byte-identical cascade ordering depend on this exact formula.

use crate::model::Path;

/// Compute the specificity weight for one selector path.
pub fn path_weight(path: &Path) -> u32 {
    let count: usize = path
        .tags
        .iter()
        .map(|tag| usize::from(tag.attribute.is_some()) + tag.pseudo_classes.len())
        .sum();
    100 * count as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeOperator, PseudoClass, Relation, Tag};

    fn named(name: &str) -> Tag {
        Tag {
            name: Some(name.to_string()),
            ..Tag::default()
        }
    }

    #[test]
    fn test_plain_path_weighs_one() {
        let path = Path {
            tags: vec![named("div"), named("p")],
        };
        assert_eq!(path_weight(&path), 1);
    }

    #[test]
    fn test_attribute_and_pseudo_each_add_hundred() {
        let mut tag = named("a");
        tag.attribute = Some(Attribute {
            key: "href".to_string(),
            op: AttributeOperator::Presence,
            value: None,
        });
        tag.pseudo_classes.push(PseudoClass {
            name: "hover".to_string(),
            argument: None,
        });
        let path = Path { tags: vec![tag] };
        assert_eq!(path_weight(&path), 201);
    }

    #[test]
    fn test_id_selectors_do_not_weigh_more() {
        // Divergence from the full CSS3 a-b-c specificity: an id tag pair
        // counts the same as a bare element chain. Kept for compatibility.
        let path = Path {
            tags: vec![
                Tag {
                    relation: Relation::Id,
                    ..Tag::default()
                },
                named("main"),
            ],
        };
        assert_eq!(path_weight(&path), 1);
    }
}
