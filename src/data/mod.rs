pub mod galtinn_role;
pub mod verification;

#[cfg(test)]
mod test;
