//! NIF entry points
//!
//! Documents live in a `ResourceArc`; nodes cross the boundary as record
//! indices. Any index that does not name an element record yields `nil`.

use rustler::{Binary, Encoder, Env, NifResult, Term};

use crate::resource::{DocumentRef, DocumentResource};
use crate::term::{self, attributes_to_term, bytes_to_binary, children_to_term, contents_to_term};

/// Parse XML into a document (returns {:ok, doc} or {:error, reason})
#[rustler::nif]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match DocumentResource::parse(input.as_slice().to_vec()) {
        Ok(doc) => {
            let arc = DocumentRef::new(doc);
            Ok((term::ok(), arc).encode(env))
        }
        Err(err) => Ok((term::error(), err.to_string()).encode(env)),
    }
}

/// Record index of the synthetic root
#[rustler::nif]
fn root(_doc: DocumentRef) -> usize {
    crate::index::builder::ROOT
}

/// Element name as a binary
#[rustler::nif]
fn name<'a>(env: Env<'a>, doc: DocumentRef, index: usize) -> NifResult<Term<'a>> {
    Ok(match doc.node(index) {
        Some(node) => bytes_to_binary(env, node.name()),
        None => rustler::types::atom::nil().encode(env),
    })
}

/// Attributes as `[{key, value}]`
#[rustler::nif]
fn attributes<'a>(env: Env<'a>, doc: DocumentRef, index: usize) -> NifResult<Term<'a>> {
    Ok(match doc.node(index) {
        Some(node) => attributes_to_term(env, &node),
        None => rustler::types::atom::nil().encode(env),
    })
}

/// Child element indices
#[rustler::nif]
fn children<'a>(env: Env<'a>, doc: DocumentRef, index: usize) -> NifResult<Term<'a>> {
    Ok(match doc.node(index) {
        Some(node) => children_to_term(env, &node),
        None => rustler::types::atom::nil().encode(env),
    })
}

/// Mixed content entries
#[rustler::nif]
fn contents<'a>(env: Env<'a>, doc: DocumentRef, index: usize) -> NifResult<Term<'a>> {
    Ok(match doc.node(index) {
        Some(node) => contents_to_term(env, &node),
        None => rustler::types::atom::nil().encode(env),
    })
}

rustler::init!("Elixir.RustyXML.Arena.Native");
