#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Router fixture with public, parameterized, nested and admin routes.
#[allow(dead_code)]
pub const APP_TSX: &str = r#"
<Routes>
  <Route path="/admin/login" element={<AdminLogin />} />
  <Route path="/admin" element={<AdminLayout />}>
    <Route path="kategori-fotograflari" element={<CategoryPhotos />} />
  </Route>
  <Route path="/" element={<HomePage />} />
  <Route path="/sss" element={<Faq />} />
  <Route path="/urun/:sku" element={<ProductDetails />} />
  <Route path="*" element={<NotFound />} />
</Routes>
"#;

/// Create a configured `sitegen` command running inside `workdir`.
///
/// Inherited `SITEGEN_*` variables are cleared so the host environment
/// cannot leak into a test.
#[allow(dead_code)]
pub fn sitegen_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitegen"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.current_dir(workdir);
    for var in [
        "SITEGEN_BASE_URL",
        "SITEGEN_API_URL",
        "SITEGEN_API_KEY",
        "SITEGEN_UPLOAD_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write the default input layout (exports and router file) into `workdir`.
#[allow(dead_code)]
pub fn write_inputs(workdir: &Path, products: &str, categories: &str) {
    let uploads = workdir.join("upload_folders");
    std::fs::create_dir_all(&uploads).unwrap();
    std::fs::write(uploads.join("product_upload_v4.json"), products).unwrap();
    std::fs::write(uploads.join("category_upload.json"), categories).unwrap();

    let router = workdir.join("react/src");
    std::fs::create_dir_all(&router).unwrap();
    std::fs::write(router.join("App.tsx"), APP_TSX).unwrap();
}

/// Extract every `<loc>` value from a sitemap document.
#[allow(dead_code)]
pub fn locations(xml: &str) -> Vec<String> {
    xml.split("<loc>")
        .skip(1)
        .filter_map(|chunk| chunk.split("</loc>").next())
        .map(str::to_string)
        .collect()
}
