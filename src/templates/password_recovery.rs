use super::{FOOTER, ORGANIZATION_NAME, SIGNATURE};

pub const EXPIRATION_NOTICE: &str = "Este enlace expirará en 15 minutos.";

#[derive(Debug, Clone, Copy)]
pub struct PasswordRecoveryEmail<'a> {
  pub user_name: &'a str,
  pub reset_url: &'a str,
}

pub fn render_password_recovery_email(data: &PasswordRecoveryEmail<'_>) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Recuperación de Contraseña</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f4f4f4;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width: 600px; margin: 20px auto; background-color: #ffffff; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
    <tr>
      <td style="padding: 40px 30px;">
        <div style="font-family: Arial, sans-serif; color: #333;">

          <div style="text-align: center; margin-bottom: 30px;">
            <h1 style="color: #007bff; margin: 0; font-size: 24px;">{organization}</h1>
          </div>

          <h2 style="color: #333; margin-bottom: 20px;">Recuperación de Contraseña</h2>

          <p style="line-height: 1.6; margin-bottom: 20px;">
            Estimado(a) <strong>{user_name}</strong>,
          </p>

          <p style="line-height: 1.6; margin-bottom: 25px;">
            Hemos recibido una solicitud para restablecer tu contraseña. Para continuar, haz clic en el siguiente botón:
          </p>

          <div style="text-align: center; margin-bottom: 25px;">
            <a href="{reset_url}"
               style="background-color: #007bff; color: white; padding: 14px 28px; text-align: center; text-decoration: none; display: inline-block; border-radius: 6px; font-weight: bold; font-size: 16px;">
              Restablecer Contraseña
            </a>
          </div>

          <div style="background-color: #fff3cd; border: 1px solid #ffc107; border-radius: 6px; padding: 15px; margin-bottom: 20px;">
            <p style="margin: 0; color: #856404; font-size: 14px;">
              ⏰ <strong>Importante:</strong> {expiration_notice}
            </p>
          </div>

          <p style="line-height: 1.6; margin-bottom: 20px; color: #666;">
            Si no solicitaste este cambio, puedes ignorar este correo. Tu contraseña permanecerá sin cambios.
          </p>

          <hr style="border: none; border-top: 1px solid #eee; margin: 25px 0;">

          <p style="font-size: 13px; color: #777; line-height: 1.5;">
            Si no puede hacer clic en el botón, copie y pegue el siguiente enlace en su navegador:<br>
            <a href="{reset_url}" style="color: #007bff; word-break: break-all;">{reset_url}</a>
          </p>

          {signature}

        </div>
      </td>
    </tr>

    {footer}
  </table>
</body>
</html>"#,
    organization = ORGANIZATION_NAME,
    user_name = data.user_name,
    reset_url = data.reset_url,
    expiration_notice = EXPIRATION_NOTICE,
    signature = SIGNATURE,
    footer = FOOTER,
  )
}
