//! # View State
//!
//! Everything the product screen renders, as plain data. [`ViewState`] is owned by the
//! [`ViewActor`](crate::view::ViewActor); callers only ever see clones of it through
//! [`ViewClient::snapshot`](crate::view::ViewClient::snapshot).

use crate::model::Product;
use crate::service::ImageUpload;
use std::collections::HashSet;

/// Visibility of a modal form.
///
/// `Closed -> Open` on a user action, `Open -> Closed` on an explicit close or when the
/// dialog's primary submit succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

impl DialogState {
    pub fn is_open(self) -> bool {
        self == DialogState::Open
    }
}

/// The product screen's state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// The displayed collection, in server order (or search-merged order).
    pub products: Vec<Product>,
    /// Copy of the product being edited. Never shares identity with `products`.
    pub edit_draft: Option<Product>,
    /// Form contents of the create dialog.
    pub create_draft: Product,
    /// Image chosen for the create-with-image flow.
    pub selected_file: Option<ImageUpload>,
    /// The raw text the user last searched for.
    pub search_text: String,
    pub create_dialog: DialogState,
    pub edit_dialog: DialogState,
    /// Result of the most recent create-form validation.
    pub form_valid: bool,
}

impl ViewState {
    pub fn contains_id(&self, id: &str) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    /// Clears the create form back to an empty draft.
    pub fn reset_create_form(&mut self) {
        self.create_draft = Product::empty();
        self.selected_file = None;
        self.form_valid = false;
    }

    pub(crate) fn apply(&mut self, change: &Reconcile) {
        change.apply_to(&mut self.products);
    }
}

/// A write the server has confirmed, to be reflected in the local collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconcile {
    /// Replace the product with the same id in place, or append it.
    Upsert(Product),
    /// Drop every product with this id.
    Remove(String),
}

impl Reconcile {
    pub fn apply_to(&self, products: &mut Vec<Product>) {
        match self {
            Reconcile::Upsert(product) => {
                match products.iter().position(|p| p.id == product.id) {
                    Some(index) => {
                        products[index] = product.clone();
                        // Leave exactly one entry for this id.
                        let mut seen = false;
                        products.retain(|p| {
                            if p.id != product.id {
                                return true;
                            }
                            !std::mem::replace(&mut seen, true)
                        });
                    }
                    None => products.push(product.clone()),
                }
            }
            Reconcile::Remove(id) => products.retain(|p| &p.id != id),
        }
    }
}

/// Orders search results ahead of the rest of the known collection.
///
/// Server matches come first in server order, followed by every previously loaded
/// product that did not match, in its previous order. Each id appears at most once.
pub fn merge_search_results(matches: Vec<Product>, previous: &[Product]) -> Vec<Product> {
    let mut seen: HashSet<String> = HashSet::with_capacity(matches.len() + previous.len());
    let mut merged = Vec::with_capacity(matches.len() + previous.len());
    for product in matches.into_iter().chain(previous.iter().cloned()) {
        if seen.insert(product.id.clone()) {
            merged.push(product);
        }
    }
    merged
}
