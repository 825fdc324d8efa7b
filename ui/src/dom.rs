//! In-memory document model shared by every component.
//!
//! Components never own markup. They hold a cheap [`Document`] clone and a
//! handful of [`NodeId`]s resolved at bind time, then mutate the shared tree
//! through the helpers below (class toggles, attributes, inline styles,
//! body rows). A lookup that matches nothing returns `None`/empty, so a
//! component bound against a page without its markup degrades to a no-op.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Stable handle to an element, valid until the element is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(u64);

/// Tag given to nodes holding raw markup that replaced an element.
pub const FRAGMENT_TAG: &str = "#fragment";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    #[serde(skip)]
    node: NodeId,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Raw markup injected from a partial. Never parsed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Accepts a space separated class list, like the `class` attribute.
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }
}

/// Simple selectors; [`Selector::and`] builds compound ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Id(String),
    IdPrefix(String),
    Class(String),
    Tag(String),
    HasAttr(String),
    AttrEq(String, String),
    All(Vec<Selector>),
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }

    pub fn id_prefix(prefix: &str) -> Self {
        Selector::IdPrefix(prefix.to_string())
    }

    pub fn class(class: &str) -> Self {
        Selector::Class(class.to_string())
    }

    pub fn tag(tag: &str) -> Self {
        Selector::Tag(tag.to_string())
    }

    pub fn attr(name: &str) -> Self {
        Selector::HasAttr(name.to_string())
    }

    pub fn attr_eq(name: &str, value: &str) -> Self {
        Selector::AttrEq(name.to_string(), value.to_string())
    }

    pub fn and(self, other: Selector) -> Self {
        match self {
            Selector::All(mut parts) => {
                parts.push(other);
                Selector::All(parts)
            }
            single => Selector::All(vec![single, other]),
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Selector::IdPrefix(prefix) => element
                .id
                .as_deref()
                .is_some_and(|id| id.starts_with(prefix.as_str())),
            Selector::Class(class) => element.has_class(class),
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Selector::HasAttr(name) => element.attributes.contains_key(name),
            Selector::AttrEq(name, value) => element.attr(name) == Some(value.as_str()),
            Selector::All(parts) => parts.iter().all(|part| part.matches(element)),
        }
    }
}

/// Where [`Document::insert_html`] puts fetched markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    /// Swap the element itself for the markup.
    Replace,
    Prepend,
    Append,
    /// Replace the element's content.
    #[default]
    Inner,
}

struct Tree {
    root: Element,
    next_id: u64,
}

impl Tree {
    fn adopt(&mut self, element: &mut Element) {
        self.next_id += 1;
        element.node = NodeId(self.next_id);
        for child in &mut element.children {
            self.adopt(child);
        }
    }

    fn find(&self, node: NodeId) -> Option<&Element> {
        find_in(&self.root, node)
    }

    fn find_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        find_in_mut(&mut self.root, node)
    }

    /// Parent id and index of `node` among its siblings.
    fn position(&self, node: NodeId) -> Option<(NodeId, usize)> {
        position_in(&self.root, node)
    }
}

fn find_in(element: &Element, node: NodeId) -> Option<&Element> {
    if element.node == node {
        return Some(element);
    }
    element.children.iter().find_map(|child| find_in(child, node))
}

fn find_in_mut(element: &mut Element, node: NodeId) -> Option<&mut Element> {
    if element.node == node {
        return Some(element);
    }
    element
        .children
        .iter_mut()
        .find_map(|child| find_in_mut(child, node))
}

fn position_in(element: &Element, node: NodeId) -> Option<(NodeId, usize)> {
    if let Some(index) = element.children.iter().position(|c| c.node == node) {
        return Some((element.node, index));
    }
    element
        .children
        .iter()
        .find_map(|child| position_in(child, node))
}

fn collect(element: &Element, selector: &Selector, out: &mut Vec<NodeId>) {
    for child in &element.children {
        if selector.matches(child) {
            out.push(child.node);
        }
        collect(child, selector, out);
    }
}

fn ancestors(element: &Element, node: NodeId, chain: &mut Vec<NodeId>) -> bool {
    if element.node == node {
        chain.push(element.node);
        return true;
    }
    for child in &element.children {
        if ancestors(child, node, chain) {
            chain.push(element.node);
            return true;
        }
    }
    false
}

/// Shared handle to the page tree. Clones see the same document.
#[derive(Clone)]
pub struct Document {
    inner: Arc<RwLock<Tree>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_body(Element::new("body"))
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document whose root is `<html>` with `body` as its only child.
    pub fn from_body(body: Element) -> Self {
        Self::from_root(Element::new("html").with_child(body))
    }

    pub fn from_root(mut root: Element) -> Self {
        let mut tree = Tree { root: Element::default(), next_id: 0 };
        tree.adopt(&mut root);
        tree.root = root;
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.read(|tree| tree.find(node).map(f))
    }

    fn with_element_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        self.write(|tree| tree.find_mut(node).map(f))
    }

    pub fn root(&self) -> NodeId {
        self.read(|tree| tree.root.node)
    }

    pub fn body(&self) -> NodeId {
        self.query(&Selector::tag("body"))
            .unwrap_or_else(|| self.root())
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.read(|tree| tree.find(node).is_some())
    }

    /// Detached copy of the element and its subtree.
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.with_element(node, Element::clone)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&Selector::id(id))
    }

    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// Every match in document order, root excluded.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_all_in(self.root(), selector)
    }

    pub fn query_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all_in(scope, selector).into_iter().next()
    }

    /// Descendants of `scope` matching `selector`; `scope` itself is skipped.
    pub fn query_all_in(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.read(|tree| {
            let mut out = Vec::new();
            if let Some(element) = tree.find(scope) {
                collect(element, selector, &mut out);
            }
            out
        })
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        self.read(|tree| {
            let mut chain = Vec::new();
            ancestors(&tree.root, node, &mut chain);
            chain
                .into_iter()
                .find(|id| tree.find(*id).is_some_and(|el| selector.matches(el)))
        })
    }

    /// True when `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.read(|tree| {
            tree.find(ancestor)
                .is_some_and(|element| find_in(element, node).is_some())
        })
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.read(|tree| tree.position(node).map(|(parent, _)| parent))
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_element(node, |el| el.children.iter().map(|c| c.node).collect())
            .unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.with_element(node, |el| el.tag.clone())
    }

    pub fn id_of(&self, node: NodeId) -> Option<String> {
        self.with_element(node, |el| el.id.clone()).flatten()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element(node, |el| el.has_class(class))
            .unwrap_or(false)
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        self.with_element_mut(node, |el| {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        });
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        self.with_element_mut(node, |el| el.classes.retain(|c| c != class));
    }

    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&self, node: NodeId, class: &str) -> bool {
        let on = !self.has_class(node, class);
        self.set_class(node, class, on);
        on
    }

    pub fn set_class(&self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Replace the whole class list, like assigning `className`.
    pub fn set_class_name(&self, node: NodeId, classes: &str) {
        self.with_element_mut(node, |el| {
            el.classes.clear();
            for class in classes.split_whitespace() {
                if !el.has_class(class) {
                    el.classes.push(class.to_string());
                }
            }
        });
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_element(node, |el| el.attr(name).map(str::to_string))
            .flatten()
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_element_mut(node, |el| {
            el.attributes.insert(name.to_string(), value.to_string());
        });
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.with_element_mut(node, |el| {
            el.attributes.remove(name);
        });
    }

    /// `data-<key>` attribute.
    pub fn data(&self, node: NodeId, key: &str) -> Option<String> {
        self.attribute(node, &format!("data-{key}"))
    }

    /// Form control value; absent reads as empty.
    pub fn value(&self, node: NodeId) -> String {
        self.attribute(node, "value").unwrap_or_default()
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.set_attribute(node, "value", value);
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_element(node, |el| el.style.get(property).cloned())
            .flatten()
    }

    /// An empty value clears the property.
    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.with_element_mut(node, |el| {
            if value.is_empty() {
                el.style.remove(property);
            } else {
                el.style.insert(property.to_string(), value.to_string());
            }
        });
    }

    pub fn text(&self, node: NodeId) -> String {
        self.with_element(node, Element::text_content)
            .unwrap_or_default()
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        self.with_element_mut(node, |el| {
            el.text = text.to_string();
            el.html.clear();
            el.children.clear();
        });
    }

    pub fn html(&self, node: NodeId) -> String {
        self.with_element(node, |el| el.html.clone())
            .unwrap_or_default()
    }

    /// Inserts raw markup. Returns the node now holding it: `node` itself,
    /// or the fragment that took its place for [`InsertPosition::Replace`].
    pub fn insert_html(&self, node: NodeId, position: InsertPosition, html: &str) -> Option<NodeId> {
        match position {
            InsertPosition::Inner => self.with_element_mut(node, |el| {
                el.html = html.to_string();
                el.text.clear();
                el.children.clear();
                el.node
            }),
            InsertPosition::Prepend => self.with_element_mut(node, |el| {
                el.html = format!("{html}{}", el.html);
                el.node
            }),
            InsertPosition::Append => self.with_element_mut(node, |el| {
                el.html.push_str(html);
                el.node
            }),
            InsertPosition::Replace => {
                if self.parent(node).is_none() {
                    return self.insert_html(node, InsertPosition::Inner, html);
                }
                self.replace_with(node, Element::new(FRAGMENT_TAG).with_html(html))
            }
        }
    }

    pub fn append_child(&self, parent: NodeId, child: Element) -> Option<NodeId> {
        self.insert_child(parent, usize::MAX, child)
    }

    pub fn prepend_child(&self, parent: NodeId, child: Element) -> Option<NodeId> {
        self.insert_child(parent, 0, child)
    }

    /// Inserts at `index`, clamped to the child count.
    pub fn insert_child(&self, parent: NodeId, index: usize, mut child: Element) -> Option<NodeId> {
        self.write(|tree| {
            tree.find(parent)?;
            tree.adopt(&mut child);
            let id = child.node;
            let element = tree.find_mut(parent)?;
            let index = index.min(element.children.len());
            element.children.insert(index, child);
            Some(id)
        })
    }

    /// Detaches `node` and returns its subtree.
    pub fn remove(&self, node: NodeId) -> Option<Element> {
        self.write(|tree| {
            let (parent, index) = tree.position(node)?;
            let parent = tree.find_mut(parent)?;
            Some(parent.children.remove(index))
        })
    }

    /// Puts `replacement` where `node` was.
    pub fn replace_with(&self, node: NodeId, mut replacement: Element) -> Option<NodeId> {
        self.write(|tree| {
            let (parent, index) = tree.position(node)?;
            tree.adopt(&mut replacement);
            let id = replacement.node;
            let parent = tree.find_mut(parent)?;
            parent.children[index] = replacement;
            Some(id)
        })
    }

    pub fn replace_children(&self, parent: NodeId, children: Vec<Element>) -> Vec<NodeId> {
        self.write(|tree| {
            if tree.find(parent).is_none() {
                return Vec::new();
            }
            let mut children = children;
            for child in &mut children {
                tree.adopt(child);
            }
            let ids = children.iter().map(|c| c.node).collect();
            if let Some(element) = tree.find_mut(parent) {
                element.text.clear();
                element.html.clear();
                element.children = children;
            }
            ids
        })
    }

    /// Moves `node` into `wrapper`, which takes its place. `node` keeps its id.
    pub fn wrap(&self, node: NodeId, mut wrapper: Element) -> Option<NodeId> {
        self.write(|tree| {
            let (parent, index) = tree.position(node)?;
            tree.adopt(&mut wrapper);
            let wrapper_id = wrapper.node;
            let parent = tree.find_mut(parent)?;
            let wrapped = std::mem::replace(&mut parent.children[index], wrapper);
            parent.children[index].children.push(wrapped);
            Some(wrapper_id)
        })
    }

    /// Puts `child` where `wrapper` was and drops the wrapper with the rest
    /// of its content.
    pub fn unwrap(&self, wrapper: NodeId, child: NodeId) -> bool {
        self.write(|tree| {
            let Some((parent, index)) = tree.position(wrapper) else {
                return false;
            };
            let Some((holder, child_index)) = tree.position(child) else {
                return false;
            };
            let Some(holder_el) = tree.find_mut(holder) else {
                return false;
            };
            let detached = holder_el.children.remove(child_index);
            match tree.find_mut(parent) {
                Some(parent) => {
                    parent.children[index] = detached;
                    true
                }
                None => false,
            }
        })
    }
}
