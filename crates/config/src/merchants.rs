use serde::{Deserialize, Serialize};

/// A merchant the gift card contract knows by index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Merchant<'a> {
    pub index: u64,
    pub name: &'a str,
}

/// The ordered list of merchants a gift card can be restricted to.
///
/// The position in the list is the merchant index passed to the contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantCatalogue {
    names: Vec<String>,
}

impl Default for MerchantCatalogue {
    fn default() -> Self {
        Self::new(["Amazon", "Uber", "Zomato", "Starbucks", "Netflix"])
    }
}

impl MerchantCatalogue {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns `true` if `index` refers to a known merchant.
    pub fn contains(&self, index: u64) -> bool {
        usize::try_from(index).is_ok_and(|index| index < self.names.len())
    }

    pub fn get(&self, index: u64) -> Option<Merchant<'_>> {
        let name = self.names.get(usize::try_from(index).ok()?)?;
        Some(Merchant { index, name })
    }

    pub fn iter(&self) -> impl Iterator<Item = Merchant<'_>> {
        self.names.iter().zip(0u64..).map(|(name, index)| Merchant { index, name })
    }
}
