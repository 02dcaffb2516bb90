//! Verification and password reset emails

use crate::domain::entities::user::User;

use super::EmailMessage;

fn link(frontend_url: &str, path: &str, token: &str) -> String {
    format!("{}/{}/{}", frontend_url.trim_end_matches('/'), path, token)
}

/// Email asking the user to confirm their address
pub fn verification_email(user: &User, token: &str, frontend_url: &str) -> EmailMessage {
    let url = link(frontend_url, "verify-email", token);
    EmailMessage {
        to: user.email.clone(),
        subject: String::from("Email Verification"),
        text: format!(
            "Hello {},\n\nPlease verify your email address by opening the link below:\n\n{}\n\nIf you did not create an account, you can ignore this email.",
            user.first_name, url
        ),
        html: format!(
            "<h1>Email Verification</h1><p>Hello {},</p><p>Please verify your email address by clicking the link below:</p><a href=\"{}\">Verify Email</a><p>If you did not create an account, you can ignore this email.</p>",
            user.first_name, url
        ),
    }
}

/// Email carrying a password reset link
pub fn password_reset_email(
    user: &User,
    token: &str,
    frontend_url: &str,
    expires_in_minutes: i64,
) -> EmailMessage {
    let url = link(frontend_url, "reset-password", token);
    EmailMessage {
        to: user.email.clone(),
        subject: String::from("Password Reset Request"),
        text: format!(
            "Hello {},\n\nYou requested a password reset. Open the link below to set a new password:\n\n{}\n\nThe link expires in {} minutes. If you did not request this, you can ignore this email.",
            user.first_name, url, expires_in_minutes
        ),
        html: format!(
            "<h1>Password Reset</h1><p>Hello {},</p><p>You requested a password reset. Click the link below to set a new password:</p><a href=\"{}\">Reset Password</a><p>The link expires in {} minutes. If you did not request this, you can ignore this email.</p>",
            user.first_name, url, expires_in_minutes
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_embed_token() {
        let user = User::new("mail@example.com", "hash", "Mia", "Lee");

        let verify = verification_email(&user, "abc123", "https://shop.example.com/");
        assert_eq!(verify.to, "mail@example.com");
        assert!(verify
            .text
            .contains("https://shop.example.com/verify-email/abc123"));

        let reset = password_reset_email(&user, "xyz", "https://shop.example.com", 60);
        assert!(reset.html.contains("https://shop.example.com/reset-password/xyz"));
        assert!(reset.text.contains("60 minutes"));
    }
}
