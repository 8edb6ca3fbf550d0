//! HTML bodies for the transactional emails.
//!
//! Every renderer returns a complete, self-contained document with inline
//! styles only. Values are interpolated as given, without HTML escaping.

mod password_recovery;
mod registration;

pub use password_recovery::{render_password_recovery_email, PasswordRecoveryEmail};
pub use registration::{render_registration_email, RegistrationEmail};

pub const ORGANIZATION_NAME: &str = "Centro Médico";

const SIGNATURE: &str = r#"<p style="line-height: 1.6; margin-top: 25px;">
            Atentamente,<br>
            <strong>El equipo del Centro Médico</strong>
          </p>"#;

const FOOTER: &str = r#"<tr>
      <td style="background-color: #f8f9fa; padding: 20px 30px; border-radius: 0 0 8px 8px;">
        <p style="font-family: Arial, sans-serif; font-size: 12px; color: #999; text-align: center; margin: 0;">
          Este es un correo automático, por favor no responda a este mensaje.
        </p>
      </td>
    </tr>"#;
