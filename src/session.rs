// 会话状态读写
// 闪现消息与登录标记都保存在会话中

use tower_sessions::Session;
use tower_sessions::session::Error;

pub const FLASH_KEY: &str = "flash";
pub const AUTH_USER_KEY: &str = "authenticatedUserID";

pub async fn put_flash(session: &Session, message: &str) -> Result<(), Error> {
    session.insert(FLASH_KEY, message).await
}

/// 读取并清除闪现消息，没有则返回空字符串
pub async fn pop_flash(session: &Session) -> Result<String, Error> {
    Ok(session.remove::<String>(FLASH_KEY).await?.unwrap_or_default())
}

pub async fn authenticated_user(session: &Session) -> Result<Option<i32>, Error> {
    session.get::<i32>(AUTH_USER_KEY).await
}

pub async fn is_authenticated(session: &Session) -> Result<bool, Error> {
    Ok(authenticated_user(session).await?.is_some())
}

/// 登录：更换会话 ID 后写入用户 ID
pub async fn log_in(session: &Session, user_id: i32) -> Result<(), Error> {
    session.cycle_id().await?;
    session.insert(AUTH_USER_KEY, user_id).await
}

pub async fn log_out(session: &Session) -> Result<(), Error> {
    session.cycle_id().await?;
    session.remove::<i32>(AUTH_USER_KEY).await?;
    Ok(())
}
