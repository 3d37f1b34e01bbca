/// Output port: one-way hashing of submitted passwords before persistence.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash `password` into a self-describing string (salt and parameters included).
    fn hash(&self, password: &str) -> Result<String, String>;
}
