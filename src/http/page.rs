//! Static presentation: the HTML form and the service manifest.

use serde::Serialize;

pub const MANIFEST_PATH: &str = "/manifest.json";

const MANIFEST_NAME: &str = "Conversor de unidades de receta";
const MANIFEST_DESCRIPTION: &str =
    "Convierte ingredientes de una receta de unidades métricas a imperiales y viceversa";
const MANIFEST_AUTHORS: &[&str] = &["Claudia Rebeca Hodoroga, Federico Diaz"];

/// Machine-readable service descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub name: &'static str,
    pub url: String,
    pub description: &'static str,
    pub authors: &'static [&'static str],
}

impl Manifest {
    /// Build the manifest for a request that arrived for `host`, with the
    /// handler mounted under `mount_path`.
    pub fn new(host: &str, mount_path: &str) -> Self {
        Self {
            name: MANIFEST_NAME,
            url: format!("{}{}", host, mount_path),
            description: MANIFEST_DESCRIPTION,
            authors: MANIFEST_AUTHORS,
        }
    }
}

/// Parameter description and pre-filled conversion form.
pub const FORM_PAGE: &str = r#"<html>
    <head>
        <title>Conversor de unidades para recetas</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 20px; }
            .container { max-width: 600px; margin: 0 auto; }
            h1 { color: #333; }
            .info { background-color: #f0f0f0; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
            code { background-color: #e0e0e0; padding: 2px 4px; border-radius: 3px; }
            form { margin-top: 20px; }
            label, input, select { display: block; margin-bottom: 10px; }
            button { margin-top: 10px; }
        </style>
    </head>
    <body>
        <div class="container">
            <h1>API de Conversión de Unidades</h1>
            <div class="info">
                <p><strong>Descripción:</strong> Esta API convierte ingredientes de recetas de unidades métricas a imperiales y viceversa.</p>
                <p><strong>Parámetros:</strong></p>
                <ul>
                    <li><code>source_system</code>: "metric" o "imperial" - el sistema original de medida</li>
                    <li><code>target_system</code>: "metric" o "imperial" - el sistema de medida deseado</li>
                    <li><code>ingredients</code>: array JSON de ingredientes con nombre (<code>name</code>), cantidad (<code>amount</code>) y unidad (<code>unit</code>)</li>
                </ul>
            </div>

            <form action="" method="post">
                <h2>Convertir Receta</h2>

                <label for="source_system">Sistema original:</label>
                <select name="source_system" id="source_system">
                    <option value="metric">Métrico</option>
                    <option value="imperial">Imperial</option>
                </select>

                <label for="target_system">Sistema deseado:</label>
                <select name="target_system" id="target_system">
                    <option value="imperial">Imperial</option>
                    <option value="metric">Métrico</option>
                </select>

                <label for="ingredients">Ingredientes (formato JSON):</label>
                <textarea name="ingredients" id="ingredients" rows="6" cols="50">[
  {"name": "flour", "amount": 2, "unit": "cup"},
  {"name": "sugar", "amount": 0.5, "unit": "lb"}
]</textarea>

                <button type="submit">Convertir</button>
            </form>
        </div>
    </body>
</html>
"#;
