//! # Dynamic Library Loader
//!
//! This module loads the ACBrLib Boleto shared library with platform-specific
//! path resolution and binds every entry point of the native interface up
//! front, so a library that does not match the interface fails at
//! construction instead of at call time.

use libloading::{Library, Symbol};
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::ffi::bindings::*;
use crate::ffi::buffer::ResponseBuffer;
use crate::ffi::error::{BoletoError, BoletoResult};

/// Environment variable that overrides the library search
pub const LIBRARY_PATH_ENV: &str = "ACBRLIB_BOLETO_PATH";

/// Platform-specific library configuration
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub name: String,
    pub search_paths: Vec<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let (name, search_paths) = Self::get_platform_config();
        Self { name, search_paths }
    }
}

impl LibraryConfig {
    /// Configuration that only looks at `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            search_paths: vec![path],
        }
    }

    fn get_platform_config() -> (String, Vec<PathBuf>) {
        #[cfg(target_os = "windows")]
        {
            let name = if cfg!(target_pointer_width = "64") {
                "ACBrBoleto64.dll"
            } else {
                "ACBrBoleto32.dll"
            };
            let search_paths = vec![
                PathBuf::from(name),
                PathBuf::from(format!("ACBrLib/x64/{name}")),
                PathBuf::from(format!("C:/ACBrLib/Boleto/{name}")),
            ];
            (name.to_string(), search_paths)
        }

        #[cfg(not(target_os = "windows"))]
        {
            let name = if cfg!(target_pointer_width = "64") {
                "libacbrboleto64.so"
            } else {
                "libacbrboleto32.so"
            };
            let search_paths = vec![
                PathBuf::from(format!("./{name}")),
                PathBuf::from(format!("./ACBrLib/{name}")),
                PathBuf::from(format!("/usr/local/lib/{name}")),
                PathBuf::from(format!("/usr/lib/{name}")),
            ];
            (name.to_string(), search_paths)
        }
    }
}

/// Entry points resolved from the library
#[derive(Debug, Clone, Copy)]
struct BoletoSymbols {
    inicializar: Str2Fn,
    sat_inicializar: Option<Str2Fn>,
    finalizar: VoidFn,
    ultimo_retorno: OutFn,
    nome: OutFn,
    versao: OutFn,
    config_ler: StrFn,
    config_gravar: StrFn,
    config_ler_valor: Str2OutFn,
    config_gravar_valor: Str3Fn,
    configurar_dados: StrOutFn,
    incluir_titulos: Str2OutFn,
    limpar_lista: VoidFn,
    total_titulos_lista: OutFn,
    imprimir: StrFn,
    imprimir_boleto: IntStrFn,
    gerar_pdf: VoidFn,
    gerar_html: VoidFn,
    gerar_remessa: StrIntStrFn,
    ler_retorno: Str2Fn,
    enviar_email: Str4Fn,
    set_diretorio_arquivo: Str2OutFn,
    lista_bancos: OutFn,
    lista_caract_titulo: OutFn,
    lista_ocorrencias: OutFn,
    lista_ocorrencias_ex: OutFn,
    tam_nosso_numero: Str3OutFn,
    codigos_mora_aceitos: OutFn,
    seleciona_banco: StrOutFn,
    montar_nosso_numero: IntOutFn,
    retorna_linha_digitavel: IntOutFn,
    retorna_codigo_barras: IntOutFn,
}

impl BoletoSymbols {
    /// Resolve every entry point. The caller must keep `library` loaded for
    /// as long as the returned pointers are used.
    unsafe fn bind(library: &Library) -> BoletoResult<Self> {
        Ok(Self {
            inicializar: get_function(library, BOLETO_INICIALIZAR)?,
            sat_inicializar: get_function(library, SAT_INICIALIZAR).ok(),
            finalizar: get_function(library, BOLETO_FINALIZAR)?,
            ultimo_retorno: get_function(library, BOLETO_ULTIMO_RETORNO)?,
            nome: get_function(library, BOLETO_NOME)?,
            versao: get_function(library, BOLETO_VERSAO)?,
            config_ler: get_function(library, BOLETO_CONFIG_LER)?,
            config_gravar: get_function(library, BOLETO_CONFIG_GRAVAR)?,
            config_ler_valor: get_function(library, BOLETO_CONFIG_LER_VALOR)?,
            config_gravar_valor: get_function(library, BOLETO_CONFIG_GRAVAR_VALOR)?,
            configurar_dados: get_function(library, BOLETO_CONFIGURAR_DADOS)?,
            incluir_titulos: get_function(library, BOLETO_INCLUIR_TITULOS)?,
            limpar_lista: get_function(library, BOLETO_LIMPAR_LISTA)?,
            total_titulos_lista: get_function(library, BOLETO_TOTAL_TITULOS_LISTA)?,
            imprimir: get_function(library, BOLETO_IMPRIMIR)?,
            imprimir_boleto: get_function(library, BOLETO_IMPRIMIR_BOLETO)?,
            gerar_pdf: get_function(library, BOLETO_GERAR_PDF)?,
            gerar_html: get_function(library, BOLETO_GERAR_HTML)?,
            gerar_remessa: get_function(library, BOLETO_GERAR_REMESSA)?,
            ler_retorno: get_function(library, BOLETO_LER_RETORNO)?,
            enviar_email: get_function(library, BOLETO_ENVIAR_EMAIL)?,
            set_diretorio_arquivo: get_function(library, BOLETO_SET_DIRETORIO_ARQUIVO)?,
            lista_bancos: get_function(library, BOLETO_LISTA_BANCOS)?,
            lista_caract_titulo: get_function(library, BOLETO_LISTA_CARACT_TITULO)?,
            lista_ocorrencias: get_function(library, BOLETO_LISTA_OCORRENCIAS)?,
            lista_ocorrencias_ex: get_function(library, BOLETO_LISTA_OCORRENCIAS_EX)?,
            tam_nosso_numero: get_function(library, BOLETO_TAM_NOSSO_NUMERO)?,
            codigos_mora_aceitos: get_function(library, BOLETO_CODIGOS_MORA_ACEITOS)?,
            seleciona_banco: get_function(library, BOLETO_SELECIONA_BANCO)?,
            montar_nosso_numero: get_function(library, BOLETO_MONTAR_NOSSO_NUMERO)?,
            retorna_linha_digitavel: get_function(library, BOLETO_RETORNA_LINHA_DIGITAVEL)?,
            retorna_codigo_barras: get_function(library, BOLETO_RETORNA_CODIGO_BARRAS)?,
        })
    }
}

/// Get a function pointer with type safety
unsafe fn get_function<T: Copy>(library: &Library, name: &str) -> BoletoResult<T> {
    debug!("Binding function: {}", name);
    let symbol: Symbol<T> =
        library
            .get(name.as_bytes())
            .map_err(|_| BoletoError::FunctionNotFound {
                function_name: name.to_string(),
            })?;
    Ok(*symbol)
}

fn out(buffer: &mut ResponseBuffer) -> (*mut c_char, *mut c_int) {
    let data = buffer.as_mut_ptr();
    let size: *mut c_int = buffer.size_mut();
    (data, size)
}

/// Loaded ACBrLib Boleto library with all entry points bound
#[derive(Debug)]
pub struct LibraryLoader {
    symbols: BoletoSymbols,
    path: PathBuf,
    // Declared last so it is unloaded after the symbols are gone
    library: Library,
}

impl LibraryLoader {
    /// Load the library using the default platform configuration
    pub fn new() -> BoletoResult<Self> {
        Self::with_config(&LibraryConfig::default())
    }

    /// Load the library at `path`
    pub fn open(path: impl AsRef<Path>) -> BoletoResult<Self> {
        let path = path.as_ref();
        // Bare file names are left to the system loader's search
        if path.components().count() > 1 && !path.exists() {
            error!("Library not found at: {}", path.display());
            return Err(BoletoError::LibraryNotFound {
                resource: path.display().to_string(),
            });
        }

        info!("Loading library from: {}", path.display());
        let library = unsafe { Library::new(path)? };
        let symbols = unsafe { BoletoSymbols::bind(&library)? };
        if symbols.sat_inicializar.is_none() {
            debug!("{} not exported by {}", SAT_INICIALIZAR, path.display());
        }

        Ok(Self {
            symbols,
            path: path.to_path_buf(),
            library,
        })
    }

    /// Load the library from the configured search paths
    pub fn with_config(config: &LibraryConfig) -> BoletoResult<Self> {
        // Check environment variable override
        if let Ok(env_path) = std::env::var(LIBRARY_PATH_ENV) {
            let env_path = PathBuf::from(env_path);
            if env_path.exists() {
                info!("Using {} from {}", env_path.display(), LIBRARY_PATH_ENV);
                return Self::open(env_path);
            }
        }

        for path in &config.search_paths {
            if path.exists() {
                return Self::open(path);
            }
            debug!("Library not found at: {}", path.display());
        }

        error!(
            "Failed to find library '{}' in any search path",
            config.name
        );
        Err(BoletoError::LibraryNotFound {
            resource: format!("Library '{}'", config.name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a symbol is exported by the loaded library
    pub fn has_function(&self, name: &str) -> bool {
        unsafe { self.library.get::<VoidFn>(name.as_bytes()).is_ok() }
    }
}

// Every call passes NUL-terminated inputs borrowed for the duration of the
// call and a buffer whose size indicator never exceeds its allocation.
impl NativeBoleto for LibraryLoader {
    fn initialize(&self, config_file: &CStr, crypto_key: &CStr) -> c_int {
        unsafe { (self.symbols.inicializar)(config_file.as_ptr(), crypto_key.as_ptr()) }
    }

    fn initialize_alternate(&self, config_file: &CStr, crypto_key: &CStr) -> Option<c_int> {
        self.symbols
            .sat_inicializar
            .map(|func| unsafe { func(config_file.as_ptr(), crypto_key.as_ptr()) })
    }

    fn finalize(&self) -> c_int {
        unsafe { (self.symbols.finalizar)() }
    }

    fn last_return(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.ultimo_retorno)(data, size) }
    }

    fn name(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.nome)(data, size) }
    }

    fn version(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.versao)(data, size) }
    }

    fn config_read(&self, config_file: &CStr) -> c_int {
        unsafe { (self.symbols.config_ler)(config_file.as_ptr()) }
    }

    fn config_write(&self, config_file: &CStr) -> c_int {
        unsafe { (self.symbols.config_gravar)(config_file.as_ptr()) }
    }

    fn config_read_value(&self, section: &CStr, key: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.config_ler_valor)(section.as_ptr(), key.as_ptr(), data, size) }
    }

    fn config_write_value(&self, section: &CStr, key: &CStr, value: &CStr) -> c_int {
        unsafe {
            (self.symbols.config_gravar_valor)(section.as_ptr(), key.as_ptr(), value.as_ptr())
        }
    }

    fn configure_data(&self, ini: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.configurar_dados)(ini.as_ptr(), data, size) }
    }

    fn include_titles(&self, ini: &CStr, output: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.incluir_titulos)(ini.as_ptr(), output.as_ptr(), data, size) }
    }

    fn clear_list(&self) -> c_int {
        unsafe { (self.symbols.limpar_lista)() }
    }

    fn total_titles(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.total_titulos_lista)(data, size) }
    }

    fn print(&self, printer: &CStr) -> c_int {
        unsafe { (self.symbols.imprimir)(printer.as_ptr()) }
    }

    fn print_title(&self, index: c_int, printer: &CStr) -> c_int {
        unsafe { (self.symbols.imprimir_boleto)(index, printer.as_ptr()) }
    }

    fn generate_pdf(&self) -> c_int {
        unsafe { (self.symbols.gerar_pdf)() }
    }

    fn generate_html(&self) -> c_int {
        unsafe { (self.symbols.gerar_html)() }
    }

    fn generate_remittance(&self, directory: &CStr, number: c_int, file_name: &CStr) -> c_int {
        unsafe { (self.symbols.gerar_remessa)(directory.as_ptr(), number, file_name.as_ptr()) }
    }

    fn read_return(&self, directory: &CStr, file_name: &CStr) -> c_int {
        unsafe { (self.symbols.ler_retorno)(directory.as_ptr(), file_name.as_ptr()) }
    }

    fn send_email(&self, to: &CStr, subject: &CStr, message: &CStr, cc: &CStr) -> c_int {
        unsafe {
            (self.symbols.enviar_email)(
                to.as_ptr(),
                subject.as_ptr(),
                message.as_ptr(),
                cc.as_ptr(),
            )
        }
    }

    fn set_output_file(&self, directory: &CStr, file: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe {
            (self.symbols.set_diretorio_arquivo)(directory.as_ptr(), file.as_ptr(), data, size)
        }
    }

    fn list_banks(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.lista_bancos)(data, size) }
    }

    fn list_title_characteristics(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.lista_caract_titulo)(data, size) }
    }

    fn list_occurrences(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.lista_ocorrencias)(data, size) }
    }

    fn list_occurrences_ex(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.lista_ocorrencias_ex)(data, size) }
    }

    fn our_number_length(
        &self,
        wallet: &CStr,
        our_number: &CStr,
        agreement: &CStr,
        buffer: &mut ResponseBuffer,
    ) -> c_int {
        let (data, size) = out(buffer);
        unsafe {
            (self.symbols.tam_nosso_numero)(
                wallet.as_ptr(),
                our_number.as_ptr(),
                agreement.as_ptr(),
                data,
                size,
            )
        }
    }

    fn accepted_late_fee_codes(&self, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.codigos_mora_aceitos)(data, size) }
    }

    fn select_bank(&self, bank_code: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.seleciona_banco)(bank_code.as_ptr(), data, size) }
    }

    fn build_our_number(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.montar_nosso_numero)(index, data, size) }
    }

    fn typeable_line(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.retorna_linha_digitavel)(index, data, size) }
    }

    fn barcode(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int {
        let (data, size) = out(buffer);
        unsafe { (self.symbols.retorna_codigo_barras)(index, data, size) }
    }
}

impl Drop for LibraryLoader {
    fn drop(&mut self) {
        debug!("Unloading library {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::error::ErrorKind;

    #[test]
    fn test_library_config_default() {
        let config = LibraryConfig::default();
        assert!(config.name.contains("oleto"));
        assert!(!config.search_paths.is_empty());
    }

    #[test]
    fn test_with_path_uses_file_name() {
        let config = LibraryConfig::with_path("/opt/acbr/libacbrboleto64.so");
        assert_eq!(config.name, "libacbrboleto64.so");
        assert_eq!(config.search_paths.len(), 1);
    }

    #[test]
    fn test_open_missing_path_is_binding_error() {
        let err = LibraryLoader::open("/nonexistent/dir/libacbrboleto64.so").unwrap_err();
        assert!(matches!(err, BoletoError::LibraryNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::Binding);
    }

    #[test]
    fn test_not_a_library_is_binding_error() {
        let path = std::env::temp_dir().join("acbrlib_boleto_not_a_library.so");
        std::fs::write(&path, b"not an ELF").unwrap();
        let err = LibraryLoader::open(&path).unwrap_err();
        assert!(matches!(err, BoletoError::LibraryLoad(_)));
        assert_eq!(err.kind(), ErrorKind::Binding);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_search_paths() {
        let config = LibraryConfig {
            name: "libacbrboleto64.so".to_string(),
            search_paths: Vec::new(),
        };
        // Only meaningful when the override is not set in the environment
        if std::env::var(LIBRARY_PATH_ENV).is_err() {
            let err = LibraryLoader::with_config(&config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Binding);
        }
    }
}
