//! # Native Interface
//!
//! The fixed interface of the ACBrLib Boleto library: exported symbol names,
//! their C signatures, the declared response capacities, and the
//! [`NativeBoleto`] trait that exposes each entry point as one typed method.
//!
//! `NativeBoleto` is the seam between the facade and the loaded library.
//! [`LibraryLoader`](crate::ffi::LibraryLoader) implements it over
//! `libloading`; any other implementation (a statically linked build, a test
//! double) can be plugged into [`Boleto`](crate::Boleto).

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use crate::ffi::buffer::ResponseBuffer;

// Exported symbols
pub const BOLETO_INICIALIZAR: &str = "Boleto_Inicializar";
pub const SAT_INICIALIZAR: &str = "SAT_Inicializar";
pub const BOLETO_FINALIZAR: &str = "Boleto_Finalizar";
pub const BOLETO_ULTIMO_RETORNO: &str = "Boleto_UltimoRetorno";
pub const BOLETO_NOME: &str = "Boleto_Nome";
pub const BOLETO_VERSAO: &str = "Boleto_Versao";
pub const BOLETO_CONFIG_LER: &str = "Boleto_ConfigLer";
pub const BOLETO_CONFIG_GRAVAR: &str = "Boleto_ConfigGravar";
pub const BOLETO_CONFIG_LER_VALOR: &str = "Boleto_ConfigLerValor";
pub const BOLETO_CONFIG_GRAVAR_VALOR: &str = "Boleto_ConfigGravarValor";
pub const BOLETO_CONFIGURAR_DADOS: &str = "Boleto_ConfigurarDados";
pub const BOLETO_INCLUIR_TITULOS: &str = "Boleto_IncluirTitulos";
pub const BOLETO_LIMPAR_LISTA: &str = "Boleto_LimparLista";
pub const BOLETO_TOTAL_TITULOS_LISTA: &str = "Boleto_TotalTitulosLista";
pub const BOLETO_IMPRIMIR: &str = "Boleto_Imprimir";
pub const BOLETO_IMPRIMIR_BOLETO: &str = "Boleto_ImprimirBoleto";
pub const BOLETO_GERAR_PDF: &str = "Boleto_GerarPDF";
pub const BOLETO_GERAR_HTML: &str = "Boleto_GerarHTML";
pub const BOLETO_GERAR_REMESSA: &str = "Boleto_GerarRemessa";
pub const BOLETO_LER_RETORNO: &str = "Boleto_LerRetorno";
pub const BOLETO_ENVIAR_EMAIL: &str = "Boleto_EnviarEmail";
pub const BOLETO_SET_DIRETORIO_ARQUIVO: &str = "Boleto_SetDiretorioArquivo";
pub const BOLETO_LISTA_BANCOS: &str = "Boleto_ListaBancos";
pub const BOLETO_LISTA_CARACT_TITULO: &str = "Boleto_ListaCaractTitulo";
pub const BOLETO_LISTA_OCORRENCIAS: &str = "Boleto_ListaOcorrencias";
pub const BOLETO_LISTA_OCORRENCIAS_EX: &str = "Boleto_ListaOcorrenciasEX";
pub const BOLETO_TAM_NOSSO_NUMERO: &str = "Boleto_TamNossoNumero";
pub const BOLETO_CODIGOS_MORA_ACEITOS: &str = "Boleto_CodigosMoraAceitos";
pub const BOLETO_SELECIONA_BANCO: &str = "Boleto_SelecionaBanco";
pub const BOLETO_MONTAR_NOSSO_NUMERO: &str = "Boleto_MontarNossoNumero";
pub const BOLETO_RETORNA_LINHA_DIGITAVEL: &str = "Boleto_RetornaLinhaDigitavel";
pub const BOLETO_RETORNA_CODIGO_BARRAS: &str = "Boleto_RetornaCodigoBarras";

/// Symbols that must be exported for the library to bind
pub const REQUIRED_SYMBOLS: &[&str] = &[
    BOLETO_INICIALIZAR,
    BOLETO_FINALIZAR,
    BOLETO_ULTIMO_RETORNO,
    BOLETO_NOME,
    BOLETO_VERSAO,
    BOLETO_CONFIG_LER,
    BOLETO_CONFIG_GRAVAR,
    BOLETO_CONFIG_LER_VALOR,
    BOLETO_CONFIG_GRAVAR_VALOR,
    BOLETO_CONFIGURAR_DADOS,
    BOLETO_INCLUIR_TITULOS,
    BOLETO_LIMPAR_LISTA,
    BOLETO_TOTAL_TITULOS_LISTA,
    BOLETO_IMPRIMIR,
    BOLETO_IMPRIMIR_BOLETO,
    BOLETO_GERAR_PDF,
    BOLETO_GERAR_HTML,
    BOLETO_GERAR_REMESSA,
    BOLETO_LER_RETORNO,
    BOLETO_ENVIAR_EMAIL,
    BOLETO_SET_DIRETORIO_ARQUIVO,
    BOLETO_LISTA_BANCOS,
    BOLETO_LISTA_CARACT_TITULO,
    BOLETO_LISTA_OCORRENCIAS,
    BOLETO_LISTA_OCORRENCIAS_EX,
    BOLETO_TAM_NOSSO_NUMERO,
    BOLETO_CODIGOS_MORA_ACEITOS,
    BOLETO_SELECIONA_BANCO,
    BOLETO_MONTAR_NOSSO_NUMERO,
    BOLETO_RETORNA_LINHA_DIGITAVEL,
    BOLETO_RETORNA_CODIGO_BARRAS,
];

/// Declared response capacities, in bytes
pub mod capacity {
    pub const LAST_RETURN: usize = 1024;
    pub const NAME: usize = 20;
    pub const VERSION: usize = 10;
    pub const CONFIG_VALUE: usize = 128;
    pub const CONFIGURE_DATA: usize = 128;
    pub const INCLUDE_TITLES: usize = 128;
    pub const TOTAL_TITLES: usize = 6;
    pub const SELECT_BANK: usize = 128;
    pub const BANKS: usize = 512;
    pub const TITLE_CHARACTERISTICS: usize = 128;
    pub const OCCURRENCES: usize = 10240;
    pub const OCCURRENCES_EX: usize = 12288;
    pub const LATE_FEE_CODES: usize = 20;
    pub const OUTPUT_FILE: usize = 20;
    pub const OUR_NUMBER_LENGTH: usize = 6;
    pub const OUR_NUMBER: usize = 50;
    pub const TYPEABLE_LINE: usize = 60;
    pub const BARCODE: usize = 50;

    /// Largest answer re-read after a truncated response
    pub const RECOVERY_LIMIT: usize = OCCURRENCES_EX * 16;
}

// C signatures
pub type Str2Fn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
pub type Str3Fn = unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> c_int;
pub type Str4Fn =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char, *const c_char) -> c_int;
pub type StrFn = unsafe extern "C" fn(*const c_char) -> c_int;
pub type VoidFn = unsafe extern "C" fn() -> c_int;
pub type OutFn = unsafe extern "C" fn(*mut c_char, *mut c_int) -> c_int;
pub type StrOutFn = unsafe extern "C" fn(*const c_char, *mut c_char, *mut c_int) -> c_int;
pub type Str2OutFn =
    unsafe extern "C" fn(*const c_char, *const c_char, *mut c_char, *mut c_int) -> c_int;
pub type Str3OutFn = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    *const c_char,
    *mut c_char,
    *mut c_int,
) -> c_int;
pub type IntStrFn = unsafe extern "C" fn(c_int, *const c_char) -> c_int;
pub type IntOutFn = unsafe extern "C" fn(c_int, *mut c_char, *mut c_int) -> c_int;
pub type StrIntStrFn = unsafe extern "C" fn(*const c_char, c_int, *const c_char) -> c_int;

/// One method per native entry point.
///
/// Methods return the raw native status. Text answers are written into the
/// given [`ResponseBuffer`]; interpreting statuses and buffers is the
/// facade's job.
pub trait NativeBoleto {
    /// `Boleto_Inicializar`
    fn initialize(&self, config_file: &CStr, crypto_key: &CStr) -> c_int;

    /// `SAT_Inicializar`, or `None` when the library does not export it
    fn initialize_alternate(&self, config_file: &CStr, crypto_key: &CStr) -> Option<c_int>;

    /// `Boleto_Finalizar`
    fn finalize(&self) -> c_int;

    /// `Boleto_UltimoRetorno`
    fn last_return(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_Nome`
    fn name(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_Versao`
    fn version(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_ConfigLer`
    fn config_read(&self, config_file: &CStr) -> c_int;

    /// `Boleto_ConfigGravar`
    fn config_write(&self, config_file: &CStr) -> c_int;

    /// `Boleto_ConfigLerValor`
    fn config_read_value(&self, section: &CStr, key: &CStr, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_ConfigGravarValor`
    fn config_write_value(&self, section: &CStr, key: &CStr, value: &CStr) -> c_int;

    /// `Boleto_ConfigurarDados`
    fn configure_data(&self, ini: &CStr, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_IncluirTitulos`
    fn include_titles(&self, ini: &CStr, output: &CStr, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_LimparLista`
    fn clear_list(&self) -> c_int;

    /// `Boleto_TotalTitulosLista`
    fn total_titles(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_Imprimir`
    fn print(&self, printer: &CStr) -> c_int;

    /// `Boleto_ImprimirBoleto`
    fn print_title(&self, index: c_int, printer: &CStr) -> c_int;

    /// `Boleto_GerarPDF`
    fn generate_pdf(&self) -> c_int;

    /// `Boleto_GerarHTML`
    fn generate_html(&self) -> c_int;

    /// `Boleto_GerarRemessa`
    fn generate_remittance(&self, directory: &CStr, number: c_int, file_name: &CStr) -> c_int;

    /// `Boleto_LerRetorno`
    fn read_return(&self, directory: &CStr, file_name: &CStr) -> c_int;

    /// `Boleto_EnviarEmail`
    fn send_email(&self, to: &CStr, subject: &CStr, message: &CStr, cc: &CStr) -> c_int;

    /// `Boleto_SetDiretorioArquivo`
    fn set_output_file(&self, directory: &CStr, file: &CStr, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_ListaBancos`
    fn list_banks(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_ListaCaractTitulo`
    fn list_title_characteristics(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_ListaOcorrencias`
    fn list_occurrences(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_ListaOcorrenciasEX`
    fn list_occurrences_ex(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_TamNossoNumero`
    fn our_number_length(
        &self,
        wallet: &CStr,
        our_number: &CStr,
        agreement: &CStr,
        buffer: &mut ResponseBuffer,
    ) -> c_int;

    /// `Boleto_CodigosMoraAceitos`
    fn accepted_late_fee_codes(&self, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_SelecionaBanco`
    fn select_bank(&self, bank_code: &CStr, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_MontarNossoNumero`
    fn build_our_number(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_RetornaLinhaDigitavel`
    fn typeable_line(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int;

    /// `Boleto_RetornaCodigoBarras`
    fn barcode(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int;
}
