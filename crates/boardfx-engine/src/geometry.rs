//! Page-space matrices for elements.
//!
//! All matrices here map a point relative to an element's center to page
//! coordinates (viewport plus scroll). The animation surface is pinned to
//! the page origin, so they can be used as wrapper transforms directly.

use boardfx_dom::Document;
use boardfx_geometry::Transform2D;

/// Accumulated rotation and scale of `element`'s ancestors, up to (not
/// including) the document element. With `include_self`, the element's own
/// transform is part of the chain.
pub fn rotation_and_scale_matrix<D: Document>(
    doc: &D,
    element: &D::Element,
    include_self: bool,
) -> Transform2D {
    let root = doc.document_element();
    let mut matrix = Transform2D::identity();
    let mut current = if include_self {
        Some(element.clone())
    } else {
        doc.parent(element)
    };

    while let Some(node) = current {
        if node == root {
            break;
        }
        matrix = doc.local_transform(&node).rotation_and_scale().then(&matrix);
        current = doc.parent(&node);
    }
    matrix
}

/// Translation to the element's bounding-box center, in page space.
pub fn page_center_offset<D: Document>(doc: &D, element: &D::Element) -> Transform2D {
    let (scroll_x, scroll_y) = doc.scroll_offset();
    let (x, y) = doc.bounding_rect(element).center();
    Transform2D::translate(x + scroll_x, y + scroll_y)
}

/// Where `element` sits, expressed as a wrapper transform. The element's own
/// transform is excluded: it stays on the element while it travels.
pub fn full_matrix<D: Document>(doc: &D, element: &D::Element) -> Transform2D {
    page_center_offset(doc, element).then(&rotation_and_scale_matrix(doc, element, false))
}

/// Matrix centered on a reference element, its own transform included,
/// optionally stripped of scale and rotation.
pub fn matrix_from_element_center<D: Document>(
    doc: &D,
    element: &D::Element,
    ignore_scale: bool,
    ignore_rotation: bool,
) -> Transform2D {
    let mut basis = rotation_and_scale_matrix(doc, element, true);
    if ignore_scale {
        basis = basis.without_scale();
    }
    if ignore_rotation {
        basis = basis.without_rotation();
    }
    page_center_offset(doc, element).then(&basis)
}

/// Center of the visible viewport, unrotated and unscaled.
pub fn screen_center_matrix<D: Document>(doc: &D) -> Transform2D {
    let (scroll_x, scroll_y) = doc.scroll_offset();
    let (width, height) = doc.viewport_size();
    Transform2D::translate(scroll_x + width / 2.0, scroll_y + height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardfx_dom::MemoryDocument;

    const EPS: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_full_matrix_of_flat_element_is_center_translation() {
        let doc = MemoryDocument::new();
        let container = doc.create_in(doc.body(), "div", 200.0, 200.0);
        doc.set_position(container, 100.0, 50.0);
        let card = doc.create_in(container, "div", 40.0, 60.0);

        let m = full_matrix(&doc, &card);
        assert!(m.is_translation(EPS));
        assert!(approx_eq(m.e, 120.0));
        assert!(approx_eq(m.f, 80.0));
    }

    #[test]
    fn test_scroll_is_added_back() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        doc.set_position(card, 300.0, 400.0);
        doc.set_scroll(0.0, 250.0);

        let m = full_matrix(&doc, &card);
        assert!(approx_eq(m.e, 320.0));
        assert!(approx_eq(m.f, 420.0));
    }

    #[test]
    fn test_ancestor_rotation_is_accumulated_but_not_self() {
        let doc = MemoryDocument::new();
        let board = doc.create_in(doc.body(), "div", 200.0, 200.0);
        doc.set_position(board, 0.0, 0.0);
        doc.set_style(&board, "transform", "rotate(90deg)").unwrap();
        let card = doc.create_in(board, "div", 20.0, 20.0);
        doc.set_style(&card, "transform", "scale(2)").unwrap();

        let m = full_matrix(&doc, &card);
        assert!(approx_eq(m.rotation().to_degrees(), 90.0));
        assert!(approx_eq(m.scale_x(), 1.0));

        let with_self = rotation_and_scale_matrix(&doc, &card, true);
        assert!(approx_eq(with_self.scale_x(), 2.0));
    }

    #[test]
    fn test_element_center_stripping() {
        let doc = MemoryDocument::new();
        let zone = doc.create_in(doc.body(), "div", 100.0, 100.0);
        doc.set_position(zone, 500.0, 100.0);
        doc.set_style(&zone, "transform", "rotate(30deg) scale(0.5)").unwrap();

        let kept = matrix_from_element_center(&doc, &zone, false, false);
        assert!(approx_eq(kept.scale_x(), 0.5));
        assert!(approx_eq(kept.rotation().to_degrees(), 30.0));

        let stripped = matrix_from_element_center(&doc, &zone, true, true);
        assert!(stripped.is_translation(EPS));
        assert!(approx_eq(stripped.e, 550.0));
        assert!(approx_eq(stripped.f, 150.0));
    }

    #[test]
    fn test_screen_center() {
        let doc = MemoryDocument::new();
        doc.set_viewport(800.0, 600.0);
        doc.set_scroll(10.0, 20.0);
        let m = screen_center_matrix(&doc);
        assert_eq!(m, Transform2D::translate(410.0, 320.0));
    }
}
