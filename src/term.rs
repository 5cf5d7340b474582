//! Elixir Term Conversion Utilities
//!
//! Converts node traversals to Elixir terms. Lists are built back to front
//! with `list_prepend` so no intermediate Vec is needed.

use rustler::{Encoder, Env, NewBinary, Term};

use crate::index::{Content, Node};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    element,
    text,
    cdata,
}

/// Copy bytes into a fresh binary term
pub fn bytes_to_binary<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// `[{key, value}, ...]` in document order
pub fn attributes_to_term<'a>(env: Env<'a>, node: &Node<'_>) -> Term<'a> {
    let attrs: Vec<_> = node.attributes().collect();
    let mut list = Term::list_new_empty(env);
    for (key, value) in attrs.into_iter().rev() {
        let tuple = (bytes_to_binary(env, key), bytes_to_binary(env, value));
        list = list.list_prepend(tuple.encode(env));
    }
    list
}

/// `[index, ...]` of child elements
pub fn children_to_term<'a>(env: Env<'a>, node: &Node<'_>) -> Term<'a> {
    let children: Vec<usize> = node.children().map(|child| child.index()).collect();
    children.encode(env)
}

/// `[{:element, index} | {:text, binary} | {:cdata, binary}, ...]`
pub fn contents_to_term<'a>(env: Env<'a>, node: &Node<'_>) -> Term<'a> {
    let contents: Vec<_> = node.contents().collect();
    let mut list = Term::list_new_empty(env);
    for content in contents.into_iter().rev() {
        let entry = match content {
            Content::Element(child) => (element(), child.index()).encode(env),
            Content::Text(run) => (text(), bytes_to_binary(env, run)).encode(env),
            Content::CData(run) => (cdata(), bytes_to_binary(env, run)).encode(env),
        };
        list = list.list_prepend(entry);
    }
    list
}
