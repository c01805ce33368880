pub mod flavor_access;
pub mod flavors;
pub mod health;
mod negotiation;

#[cfg(test)]
mod test_support;
