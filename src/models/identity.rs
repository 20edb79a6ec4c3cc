/// 当前用户的身份信息
///
/// 由身份协作方（登录系统）提供，这里只当作不透明输入使用，
/// 不做任何凭证逻辑
#[derive(Debug, Clone)]
pub struct Identity {
    /// 稳定的用户标识
    pub user_id: String,
    /// 登录邮箱
    pub email: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}
