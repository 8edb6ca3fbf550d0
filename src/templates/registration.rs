use super::{FOOTER, ORGANIZATION_NAME, SIGNATURE};

#[derive(Debug, Clone, Copy)]
pub struct RegistrationEmail<'a> {
  pub user_name: &'a str,
  pub email: &'a str,
  pub temporary_password: &'a str,
  pub verification_url: &'a str,
}

/// Welcome email with the temporary credentials and the account verification link.
pub fn render_registration_email(data: &RegistrationEmail<'_>) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Bienvenido al {organization}</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f4f4f4;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width: 600px; margin: 20px auto; background-color: #ffffff; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
    <tr>
      <td style="padding: 40px 30px;">
        <div style="font-family: Arial, sans-serif; color: #333;">

          <div style="text-align: center; margin-bottom: 30px;">
            <h1 style="color: #007bff; margin: 0; font-size: 24px;">{organization}</h1>
          </div>

          <h2 style="color: #333; margin-bottom: 20px;">¡Bienvenido(a), {user_name}!</h2>

          <p style="line-height: 1.6; margin-bottom: 20px;">
            Ha sido registrado(a) como empleado en nuestro {organization}.
          </p>

          <div style="background-color: #f8f9fa; border-radius: 8px; padding: 20px; margin-bottom: 25px;">
            <p style="margin: 0 0 10px 0; font-weight: bold; color: #333;">Sus credenciales temporales son:</p>
            <table role="presentation" cellspacing="0" cellpadding="8" style="width: 100%;">
              <tr>
                <td style="color: #666;"><strong>Email:</strong></td>
                <td style="color: #333;">{email}</td>
              </tr>
              <tr>
                <td style="color: #666;"><strong>Contraseña:</strong></td>
                <td style="color: #333; font-family: monospace; background-color: #fff; padding: 5px 10px; border-radius: 4px;">{temporary_password}</td>
              </tr>
            </table>
          </div>

          <p style="line-height: 1.6; margin-bottom: 25px;">
            Para activar su cuenta e iniciar sesión, por favor, haga clic en el siguiente botón:
          </p>

          <div style="text-align: center; margin-bottom: 25px;">
            <a href="{verification_url}"
               style="background-color: #007bff; color: white; padding: 14px 28px; text-align: center; text-decoration: none; display: inline-block; border-radius: 6px; font-weight: bold; font-size: 16px;">
              Verificar Cuenta
            </a>
          </div>

          <p style="line-height: 1.6; margin-bottom: 20px; color: #666;">
            Una vez verifique su cuenta, se recomienda cambiar su contraseña en la sección de perfil.
          </p>

          <hr style="border: none; border-top: 1px solid #eee; margin: 25px 0;">

          <p style="font-size: 13px; color: #777; line-height: 1.5;">
            Si no puede hacer clic en el botón, copie y pegue el siguiente enlace en su navegador:<br>
            <a href="{verification_url}" style="color: #007bff; word-break: break-all;">{verification_url}</a>
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
    email = data.email,
    temporary_password = data.temporary_password,
    verification_url = data.verification_url,
    signature = SIGNATURE,
    footer = FOOTER,
  )
}
