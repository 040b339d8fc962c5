use bcrypt::{hash, verify};

/// bcrypt 成本因子
pub const PASSWORD_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), PASSWORD_COST)
}

/// 校验明文密码与哈希是否匹配，比较过程为常数时间
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}
