//! Selection sets from flat or dotted field names.

/// Field requested when the caller supplies no selection.
pub const FALLBACK_FIELD: &str = "id";

#[derive(Debug, Default)]
struct SelectionNode {
    children: Vec<(String, SelectionNode)>,
}

impl SelectionNode {
    fn insert(&mut self, path: &[&str]) {
        let Some((head, rest)) = path.split_first() else {
            return;
        };

        let index = match self.children.iter().position(|(name, _)| name == head) {
            Some(index) => index,
            None => {
                self.children
                    .push(((*head).to_string(), SelectionNode::default()));
                self.children.len() - 1
            }
        };

        self.children[index].1.insert(rest);
    }

    fn render(&self, out: &mut String) {
        out.push('{');
        for (name, child) in &self.children {
            out.push(' ');
            out.push_str(name);
            if !child.children.is_empty() {
                out.push(' ');
                child.render(out);
            }
        }
        out.push_str(" }");
    }
}

/// Render a selection set such as `{ id customer { name } }`.
///
/// Dotted names nest (`customer.name`), duplicates collapse and first-seen
/// order is kept. Blank input yields `{ id }` so the document never carries
/// an empty selection.
pub fn selection_set<S: AsRef<str>>(fields: &[S]) -> String {
    let mut root = SelectionNode::default();

    for field in fields {
        let path: Vec<&str> = field
            .as_ref()
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();
        root.insert(&path);
    }

    if root.children.is_empty() {
        root.insert(&[FALLBACK_FIELD]);
    }

    let mut out = String::new();
    root.render(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fields() {
        assert_eq!(selection_set(&["id", "total"]), "{ id total }");
    }

    #[test]
    fn test_nested_fields() {
        let fields = ["id", "customer.name", "customer.address.city", "total"];
        assert_eq!(
            selection_set(&fields),
            "{ id customer { name address { city } } total }"
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(selection_set(&["id", "id", "code"]), "{ id code }");
    }

    #[test]
    fn test_empty_falls_back_to_id() {
        let empty: [&str; 0] = [];
        assert_eq!(selection_set(&empty), "{ id }");
        assert_eq!(selection_set(&["", " . "]), "{ id }");
    }
}
