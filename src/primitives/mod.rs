//! Primitives - drawable leaf shapes.
//!
//! A primitive is an [`Element`] whose type is a [`Tag`] instead of a
//! component. The reconciler never calls anything for it: the node resolves
//! to its own children, and its props are the geometry the presentation sink
//! draws and the dispatcher hit-tests.
//!
//! Geometry is center-anchored: `x`/`y` name the center of a `width` by
//! `height` box, `z` orders overlapping shapes.
//!
//! ```ignore
//! use spark_vdom::primitives::rect;
//!
//! let button = rect(
//!     Props::new()
//!         .with("x", 40).with("y", 12)
//!         .with("width", 10).with("height", 3)
//!         .with("onClick", Value::handler(|_| submit())),
//!     (),
//! );
//! ```

use crate::element::{create_element, Children, Element, Tag};
use crate::error::{Error, Result};
use crate::types::Props;

pub const RECT: Tag = Tag("RECT");
pub const SPRITE: Tag = Tag("SPRITE");

const GEOMETRY: [&str; 5] = ["x", "y", "z", "width", "height"];

/// Copy `names` (and `key`) from `props`, dropping everything else.
fn pick(props: &Props, names: &[&str]) -> Props {
    names
        .iter()
        .chain(std::iter::once(&"key"))
        .filter_map(|&name| props.get(name).map(|v| (name.to_string(), v.clone())))
        .collect()
}

/// A rectangle. Keeps geometry and `onClick`.
pub fn rect(props: Props, children: impl Into<Children>) -> Element {
    let props = pick(&props, &["x", "y", "z", "width", "height", "onClick"]);
    create_element(RECT, props, children)
}

/// A textured sprite. Keeps geometry and `texture`.
pub fn sprite(props: Props, children: impl Into<Children>) -> Element {
    let props = pick(&props, &["x", "y", "z", "width", "height", "texture"]);
    create_element(SPRITE, props, children)
}

/// Check the geometry props of a primitive.
///
/// Present geometry must be numeric; `width` and `height` must also be
/// non-negative. Absent props are fine: such a node is simply never hit.
pub fn validate_geometry(tag: Tag, props: &Props) -> Result<()> {
    for prop in GEOMETRY {
        let Some(value) = props.get(prop) else { continue };
        let invalid = |reason| Error::InvalidGeometry {
            tag: tag.name(),
            prop,
            reason,
        };

        let n = value.as_number().ok_or_else(|| invalid("not a number"))?;
        if n.is_nan() {
            return Err(invalid("not a number"));
        }
        if matches!(prop, "width" | "height") && n < 0.0 {
            return Err(invalid("negative size"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Key, Value};

    #[test]
    fn test_rect_keeps_geometry_and_click() {
        let el = rect(
            Props::new()
                .with("x", 1)
                .with("width", 5)
                .with("onClick", Value::handler(|_| {}))
                .with("color", "red")
                .with("key", "a"),
            (),
        );
        assert_eq!(el.ty().name(), "RECT");
        assert!(el.ty().is_primitive());
        assert_eq!(el.props().len(), 3);
        assert!(!el.props().contains("color"));
        assert_eq!(el.key(), Some(&Key::from("a")));
    }

    #[test]
    fn test_sprite_keeps_texture() {
        let el = sprite(Props::new().with("texture", Value::opaque(vec![0u8; 4])).with("z", 2), ());
        assert_eq!(el.ty().name(), "SPRITE");
        assert!(el.props().get("texture").and_then(|t| t.downcast_ref::<Vec<u8>>()).is_some());
        assert_eq!(el.props().number("z"), Some(2.0));
    }

    #[test]
    fn test_validate_geometry() {
        assert!(validate_geometry(RECT, &Props::new()).is_ok());
        assert!(validate_geometry(RECT, &Props::new().with("x", 1).with("width", 0)).is_ok());
        assert!(matches!(
            validate_geometry(RECT, &Props::new().with("height", -1)),
            Err(Error::InvalidGeometry { prop: "height", .. })
        ));
        assert!(matches!(
            validate_geometry(SPRITE, &Props::new().with("y", "top")),
            Err(Error::InvalidGeometry { tag: "SPRITE", prop: "y", .. })
        ));
    }
}
