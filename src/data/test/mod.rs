mod galtinn_role;
mod verification;
