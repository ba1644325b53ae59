//! 注册/登录入参的公共校验。数值类活动入参的校验在各路由与引擎内完成。

/// 密码：8-128 字符，至少一个字母和一个数字。
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 || password.len() > 128 {
        return Err("密码长度需在8到128个字符之间");
    }
    let has_alpha = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_alpha || !has_digit {
        return Err("密码必须同时包含字母和数字");
    }
    Ok(())
}

/// 邮箱：local@domain.tld 的基本形态检查，不追求 RFC 完整性。
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || local.len() > 64
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-'))
    {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|part| {
        !part.is_empty()
            && !part.starts_with('-')
            && !part.ends_with('-')
            && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// 用户名：2-50 字符，字母、数字、下划线、连字符和空格。
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let char_count = username.chars().count();
    if !(2..=50).contains(&char_count) {
        return Err("用户名长度需在2到50个字符之间");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err("用户名只能包含字母、数字、下划线、连字符和空格");
    }
    Ok(())
}
