//! # Boleto Facade
//!
//! [`Boleto`] exposes one method per native entry point. Every method follows
//! the same steps: encode the text inputs, allocate the declared response
//! buffer, call the entry point, map the status, decode the answer.
//!
//! Negative statuses become [`BoletoError`]s. Codes that carry no fixed
//! meaning (`-10` and anything undocumented) are completed with the text of
//! one `Boleto_UltimoRetorno` call.

use std::collections::BTreeMap;
use std::ffi::CString;
use std::os::raw::c_int;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::ffi::bindings::{self, capacity, NativeBoleto};
use crate::ffi::buffer::ResponseBuffer;
use crate::ffi::error::{BoletoError, BoletoResult};
use crate::ffi::library_loader::LibraryLoader;
use crate::ffi::status;
use crate::types::config::BindingConfig;
use crate::types::lists::{parse_code_descriptions, parse_count, split_list};
use crate::types::output::OutputKind;

/// Lifecycle of the native session behind a facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Library bound, `Boleto_Inicializar` not yet successful
    Bound,
    Initialized,
    /// `Boleto_Finalizar` succeeded; every further call is rejected
    Finalized,
}

/// Binding facade over one native ACBrLib Boleto instance.
///
/// The native component keeps process-global state (queued titles, selected
/// bank, configuration), so every operation takes `&mut self`. Use
/// [`SharedBoleto`](crate::SharedBoleto) to share one facade between threads.
#[derive(Debug)]
pub struct Boleto<N: NativeBoleto = LibraryLoader> {
    native: N,
    config: BindingConfig,
    state: SessionState,
}

impl Boleto<LibraryLoader> {
    /// Bind the shared library at `library_path`
    pub fn new(library_path: impl AsRef<Path>) -> BoletoResult<Self> {
        Self::with_config(BindingConfig::with_library(library_path.as_ref()))
    }

    /// Bind the library named by `config`, or search the platform paths
    pub fn with_config(config: BindingConfig) -> BoletoResult<Self> {
        let native = match &config.library_path {
            Some(path) => LibraryLoader::open(path)?,
            None => LibraryLoader::with_config(&config.library_config())?,
        };
        info!("Bound ACBrLib Boleto from {}", native.path().display());
        Ok(Self::from_native(native, config))
    }
}

impl<N: NativeBoleto> Boleto<N> {
    /// Wrap an already bound native implementation
    pub fn from_native(native: N, config: BindingConfig) -> Self {
        Self {
            native,
            config,
            state: SessionState::Bound,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Initialize the native component.
    ///
    /// An empty `config_file` lets the library create its default INI file,
    /// an empty `crypto_key` selects its default key.
    #[doc(alias = "Boleto_Inicializar")]
    pub fn initialize(&mut self, config_file: &str, crypto_key: &str) -> BoletoResult<()> {
        self.ensure_active(bindings::BOLETO_INICIALIZAR)?;
        let config_file = self.encode("eArqConfig", config_file)?;
        let crypto_key = self.encode("eChaveCrypt", crypto_key)?;

        let code = self.native.initialize(&config_file, &crypto_key);
        self.check(bindings::BOLETO_INICIALIZAR, code)?;
        self.state = SessionState::Initialized;
        info!("ACBrLib Boleto initialized");
        Ok(())
    }

    /// Initialize through the alternate `SAT_Inicializar` entry point, same
    /// semantics as [`initialize`](Self::initialize).
    #[doc(alias = "SAT_Inicializar")]
    pub fn initialize_alternate(
        &mut self,
        config_file: &str,
        crypto_key: &str,
    ) -> BoletoResult<()> {
        self.ensure_active(bindings::SAT_INICIALIZAR)?;
        let config_file = self.encode("eArqConfig", config_file)?;
        let crypto_key = self.encode("eChaveCrypt", crypto_key)?;

        let code = self
            .native
            .initialize_alternate(&config_file, &crypto_key)
            .ok_or_else(|| BoletoError::FunctionNotFound {
                function_name: bindings::SAT_INICIALIZAR.to_string(),
            })?;
        self.check(bindings::SAT_INICIALIZAR, code)?;
        self.state = SessionState::Initialized;
        info!("ACBrLib Boleto initialized through {}", bindings::SAT_INICIALIZAR);
        Ok(())
    }

    /// Release the native component. The facade rejects every call after a
    /// successful finalize.
    #[doc(alias = "Boleto_Finalizar")]
    pub fn finalize(&mut self) -> BoletoResult<()> {
        self.call(bindings::BOLETO_FINALIZAR, |native| native.finalize())?;
        self.state = SessionState::Finalized;
        info!("ACBrLib Boleto finalized");
        Ok(())
    }

    // ============================================================================
    // Diagnostics
    // ============================================================================

    /// Text of the last native answer, usually the last error message.
    ///
    /// Statuses of this call are mapped locally: a `-10` here becomes
    /// [`BoletoError::MethodCall`] with whatever text was written.
    #[doc(alias = "Boleto_UltimoRetorno")]
    pub fn last_error_message(&mut self) -> BoletoResult<String> {
        self.ensure_active(bindings::BOLETO_ULTIMO_RETORNO)?;
        self.read_last_return(capacity::LAST_RETURN, true)
    }

    #[doc(alias = "Boleto_Nome")]
    pub fn library_name(&mut self) -> BoletoResult<String> {
        self.call_text(bindings::BOLETO_NOME, capacity::NAME, |native, buffer| {
            native.name(buffer)
        })
    }

    #[doc(alias = "Boleto_Versao")]
    pub fn library_version(&mut self) -> BoletoResult<String> {
        self.call_text(bindings::BOLETO_VERSAO, capacity::VERSION, |native, buffer| {
            native.version(buffer)
        })
    }

    // ============================================================================
    // Configuration
    // ============================================================================

    /// Load the library configuration from `config_file` (default file when
    /// empty)
    #[doc(alias = "Boleto_ConfigLer")]
    pub fn config_read(&mut self, config_file: &str) -> BoletoResult<()> {
        let config_file = self.encode("eArqConfig", config_file)?;
        self.call(bindings::BOLETO_CONFIG_LER, |native| {
            native.config_read(&config_file)
        })
    }

    /// Save the library configuration to `config_file` (default file when
    /// empty)
    #[doc(alias = "Boleto_ConfigGravar")]
    pub fn config_write(&mut self, config_file: &str) -> BoletoResult<()> {
        let config_file = self.encode("eArqConfig", config_file)?;
        self.call(bindings::BOLETO_CONFIG_GRAVAR, |native| {
            native.config_write(&config_file)
        })
    }

    #[doc(alias = "Boleto_ConfigLerValor")]
    pub fn config_read_value(&mut self, section: &str, key: &str) -> BoletoResult<String> {
        let section = self.encode("eSessao", section)?;
        let key = self.encode("eChave", key)?;
        self.call_text(
            bindings::BOLETO_CONFIG_LER_VALOR,
            capacity::CONFIG_VALUE,
            |native, buffer| native.config_read_value(&section, &key, buffer),
        )
    }

    #[doc(alias = "Boleto_ConfigGravarValor")]
    pub fn config_write_value(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
    ) -> BoletoResult<()> {
        let section = self.encode("eSessao", section)?;
        let key = self.encode("eChave", key)?;
        let value = self.encode("valor", value)?;
        self.call(bindings::BOLETO_CONFIG_GRAVAR_VALOR, |native| {
            native.config_write_value(&section, &key, &value)
        })
    }

    // ============================================================================
    // Titles
    // ============================================================================

    /// Configure sender, bank and account from an ACBr INI file. Only the
    /// titles in memory are affected; the library configuration is not.
    #[doc(alias = "Boleto_ConfigurarDados")]
    pub fn configure_data(&mut self, ini: &str) -> BoletoResult<String> {
        let ini = self.encode("eArquivoIni", ini)?;
        self.call_text(
            bindings::BOLETO_CONFIGURAR_DADOS,
            capacity::CONFIGURE_DATA,
            |native, buffer| native.configure_data(&ini, buffer),
        )
    }

    /// Queue the titles of an ACBr INI file (`[Titulo1]`, `[Titulo2]`, ...)
    /// and optionally produce output for them right away.
    #[doc(alias = "Boleto_IncluirTitulos")]
    pub fn include_titles(&mut self, ini: &str, output: OutputKind) -> BoletoResult<String> {
        self.include_titles_with(ini, output.as_code())
    }

    /// [`include_titles`](Self::include_titles) with a raw output selector
    pub fn include_titles_with(&mut self, ini: &str, selector: &str) -> BoletoResult<String> {
        let ini = self.encode("eArquivoIni", ini)?;
        let selector = self.encode("eTpSaida", selector)?;
        self.call_text(
            bindings::BOLETO_INCLUIR_TITULOS,
            capacity::INCLUDE_TITLES,
            |native, buffer| native.include_titles(&ini, &selector, buffer),
        )
    }

    #[doc(alias = "Boleto_LimparLista")]
    pub fn clear_list(&mut self) -> BoletoResult<()> {
        self.call(bindings::BOLETO_LIMPAR_LISTA, |native| native.clear_list())
    }

    /// Number of queued titles
    #[doc(alias = "Boleto_TotalTitulosLista")]
    pub fn total_titles(&mut self) -> BoletoResult<usize> {
        let text = self.call_text(
            bindings::BOLETO_TOTAL_TITULOS_LISTA,
            capacity::TOTAL_TITLES,
            |native, buffer| native.total_titles(buffer),
        )?;
        to_usize(bindings::BOLETO_TOTAL_TITULOS_LISTA, &text)
    }

    /// Select the sender's bank (for example `"001"`) before including titles
    #[doc(alias = "Boleto_SelecionaBanco")]
    pub fn select_bank(&mut self, bank_code: &str) -> BoletoResult<String> {
        let bank_code = self.encode("eCodBanco", bank_code)?;
        self.call_text(
            bindings::BOLETO_SELECIONA_BANCO,
            capacity::SELECT_BANK,
            |native, buffer| native.select_bank(&bank_code, buffer),
        )
    }

    // ============================================================================
    // Output
    // ============================================================================

    /// Print every queued title on `printer` (default printer when empty)
    #[doc(alias = "Boleto_Imprimir")]
    pub fn print(&mut self, printer: &str) -> BoletoResult<()> {
        let printer = self.encode("eNomeImpressora", printer)?;
        self.call(bindings::BOLETO_IMPRIMIR, |native| native.print(&printer))
    }

    /// Print the queued title at zero-based `index`
    #[doc(alias = "Boleto_ImprimirBoleto")]
    pub fn print_title(&mut self, index: usize, printer: &str) -> BoletoResult<()> {
        let index = to_c_int("eIndice", index)?;
        let printer = self.encode("eNomeImpressora", printer)?;
        self.call(bindings::BOLETO_IMPRIMIR_BOLETO, |native| {
            native.print_title(index, &printer)
        })
    }

    #[doc(alias = "Boleto_GerarPDF")]
    pub fn generate_pdf(&mut self) -> BoletoResult<()> {
        self.call(bindings::BOLETO_GERAR_PDF, |native| native.generate_pdf())
    }

    #[doc(alias = "Boleto_GerarHTML")]
    pub fn generate_html(&mut self) -> BoletoResult<()> {
        self.call(bindings::BOLETO_GERAR_HTML, |native| native.generate_html())
    }

    /// Set the directory and file name used by PDF and HTML generation
    #[doc(alias = "Boleto_SetDiretorioArquivo")]
    pub fn set_output_file(&mut self, directory: &str, file: &str) -> BoletoResult<String> {
        let directory = self.encode("eDir", directory)?;
        let file = self.encode("eArq", file)?;
        self.call_text(
            bindings::BOLETO_SET_DIRETORIO_ARQUIVO,
            capacity::OUTPUT_FILE,
            |native, buffer| native.set_output_file(&directory, &file, buffer),
        )
    }

    /// Send the queued titles by e-mail. SMTP settings come from the library
    /// configuration.
    #[doc(alias = "Boleto_EnviarEmail")]
    pub fn send_email(
        &mut self,
        to: &str,
        subject: &str,
        message: &str,
        cc: &str,
    ) -> BoletoResult<()> {
        let to = self.encode("ePara", to)?;
        let subject = self.encode("eAssunto", subject)?;
        let message = self.encode("eMensagem", message)?;
        let cc = self.encode("eCC", cc)?;
        self.call(bindings::BOLETO_ENVIAR_EMAIL, |native| {
            native.send_email(&to, &subject, &message, &cc)
        })
    }

    // ============================================================================
    // Remittance and return files
    // ============================================================================

    /// Write the remittance file for the queued titles
    #[doc(alias = "Boleto_GerarRemessa")]
    pub fn generate_remittance(
        &mut self,
        directory: &str,
        number: u32,
        file_name: &str,
    ) -> BoletoResult<()> {
        let number = to_c_int("eNumArquivo", number)?;
        let directory = self.encode("eDir", directory)?;
        let file_name = self.encode("eNomeArq", file_name)?;
        self.call(bindings::BOLETO_GERAR_REMESSA, |native| {
            native.generate_remittance(&directory, number, &file_name)
        })
    }

    /// Read a return file into the title list
    #[doc(alias = "Boleto_LerRetorno")]
    pub fn read_return(&mut self, directory: &str, file_name: &str) -> BoletoResult<()> {
        let directory = self.encode("eDir", directory)?;
        let file_name = self.encode("eNomeArq", file_name)?;
        self.call(bindings::BOLETO_LER_RETORNO, |native| {
            native.read_return(&directory, &file_name)
        })
    }

    // ============================================================================
    // Listings
    // ============================================================================

    #[doc(alias = "Boleto_ListaBancos")]
    pub fn list_banks(&mut self) -> BoletoResult<Vec<String>> {
        let text = self.call_text(bindings::BOLETO_LISTA_BANCOS, capacity::BANKS, |native, buffer| {
            native.list_banks(buffer)
        })?;
        Ok(split_list(&text))
    }

    #[doc(alias = "Boleto_ListaCaractTitulo")]
    pub fn list_title_characteristics(&mut self) -> BoletoResult<Vec<String>> {
        let text = self.call_text(
            bindings::BOLETO_LISTA_CARACT_TITULO,
            capacity::TITLE_CHARACTERISTICS,
            |native, buffer| native.list_title_characteristics(buffer),
        )?;
        Ok(split_list(&text))
    }

    #[doc(alias = "Boleto_ListaOcorrencias")]
    pub fn list_occurrences(&mut self) -> BoletoResult<Vec<String>> {
        let text = self.call_text(
            bindings::BOLETO_LISTA_OCORRENCIAS,
            capacity::OCCURRENCES,
            |native, buffer| native.list_occurrences(buffer),
        )?;
        Ok(split_list(&text))
    }

    /// Occurrence codes and their descriptions. See
    /// [`parse_code_descriptions`] for how descriptions containing `-` are
    /// cut.
    #[doc(alias = "Boleto_ListaOcorrenciasEX")]
    pub fn list_occurrence_codes(&mut self) -> BoletoResult<BTreeMap<String, String>> {
        let text = self.call_text(
            bindings::BOLETO_LISTA_OCORRENCIAS_EX,
            capacity::OCCURRENCES_EX,
            |native, buffer| native.list_occurrences_ex(buffer),
        )?;
        Ok(parse_code_descriptions(&text))
    }

    #[doc(alias = "Boleto_CodigosMoraAceitos")]
    pub fn accepted_late_fee_codes(&mut self) -> BoletoResult<String> {
        self.call_text(
            bindings::BOLETO_CODIGOS_MORA_ACEITOS,
            capacity::LATE_FEE_CODES,
            |native, buffer| native.accepted_late_fee_codes(buffer),
        )
    }

    // ============================================================================
    // Title calculations
    // ============================================================================

    /// Length of the "nosso número" field for the selected bank
    #[doc(alias = "Boleto_TamNossoNumero")]
    pub fn our_number_length(
        &mut self,
        wallet: &str,
        our_number: &str,
        agreement: &str,
    ) -> BoletoResult<usize> {
        let wallet = self.encode("eCarteira", wallet)?;
        let our_number = self.encode("enossoNumero", our_number)?;
        let agreement = self.encode("eConvenio", agreement)?;
        let text = self.call_text(
            bindings::BOLETO_TAM_NOSSO_NUMERO,
            capacity::OUR_NUMBER_LENGTH,
            |native, buffer| native.our_number_length(&wallet, &our_number, &agreement, buffer),
        )?;
        to_usize(bindings::BOLETO_TAM_NOSSO_NUMERO, &text)
    }

    /// Complete "nosso número" of the queued title at `index`
    #[doc(alias = "Boleto_MontarNossoNumero")]
    pub fn build_our_number(&mut self, index: usize) -> BoletoResult<String> {
        let index = to_c_int("eIndice", index)?;
        self.call_text(
            bindings::BOLETO_MONTAR_NOSSO_NUMERO,
            capacity::OUR_NUMBER,
            |native, buffer| native.build_our_number(index, buffer),
        )
    }

    /// Typeable line (linha digitável) of the queued title at `index`
    #[doc(alias = "Boleto_RetornaLinhaDigitavel")]
    pub fn typeable_line(&mut self, index: usize) -> BoletoResult<String> {
        let index = to_c_int("eIndice", index)?;
        self.call_text(
            bindings::BOLETO_RETORNA_LINHA_DIGITAVEL,
            capacity::TYPEABLE_LINE,
            |native, buffer| native.typeable_line(index, buffer),
        )
    }

    /// Barcode digits of the queued title at `index`
    #[doc(alias = "Boleto_RetornaCodigoBarras")]
    pub fn barcode(&mut self, index: usize) -> BoletoResult<String> {
        let index = to_c_int("eIndice", index)?;
        self.call_text(bindings::BOLETO_RETORNA_CODIGO_BARRAS, capacity::BARCODE, |native, buffer| {
            native.barcode(index, buffer)
        })
    }

    // ============================================================================
    // Call plumbing
    // ============================================================================

    fn ensure_active(&self, operation: &str) -> BoletoResult<()> {
        if self.state == SessionState::Finalized {
            return Err(BoletoError::Finalized {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn encode(&self, parameter: &str, value: &str) -> BoletoResult<CString> {
        self.config.encoding.encode(parameter, value)
    }

    /// Call an entry point that answers with a status only
    fn call(&mut self, operation: &str, f: impl FnOnce(&N) -> c_int) -> BoletoResult<()> {
        self.ensure_active(operation)?;
        let code = f(&self.native);
        self.check(operation, code)
    }

    /// Call an entry point that answers through a response buffer
    fn call_text(
        &mut self,
        operation: &str,
        capacity: usize,
        f: impl FnOnce(&N, &mut ResponseBuffer) -> c_int,
    ) -> BoletoResult<String> {
        self.ensure_active(operation)?;
        let mut buffer = ResponseBuffer::with_capacity(capacity);
        let code = f(&self.native, &mut buffer);
        self.check(operation, code)?;

        if buffer.is_truncated() {
            if self.can_recover(buffer.reported_len()) {
                debug!(
                    "{} needs {} bytes, reading it through {}",
                    operation,
                    buffer.reported_len(),
                    bindings::BOLETO_ULTIMO_RETORNO
                );
                return self.read_last_return(buffer.reported_len(), false);
            }
            warn!(
                "{} response truncated to {} of {} bytes",
                operation,
                capacity,
                buffer.reported_len()
            );
        }
        Ok(buffer.decode(self.config.encoding))
    }

    /// Map a native status, fetching the last-error text when the code
    /// carries no fixed message
    fn check(&self, operation: &str, code: c_int) -> BoletoResult<()> {
        if status::is_success(code) {
            debug!("{} returned {}", operation, code);
            return Ok(());
        }

        warn!("{} failed with status {}", operation, code);
        let message = if status::needs_last_error(code) {
            // The operation's status wins over a failing diagnostic
            self.read_last_return(capacity::LAST_RETURN, false)
                .unwrap_or_else(|err| {
                    warn!("No diagnostic for {}: {}", operation, err);
                    err.message()
                })
        } else {
            String::new()
        };
        match BoletoError::from_status(code, message) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Truncated answers are re-read only when enabled and at most
    /// [`capacity::RECOVERY_LIMIT`] bytes long
    fn can_recover(&self, reported_len: usize) -> bool {
        if !self.config.recover_truncated_responses {
            return false;
        }
        if reported_len > capacity::RECOVERY_LIMIT {
            warn!(
                "Reported length {} exceeds the recovery limit of {} bytes",
                reported_len,
                capacity::RECOVERY_LIMIT
            );
            return false;
        }
        true
    }

    /// `Boleto_UltimoRetorno` with its own statuses mapped locally, so a
    /// failure here never triggers another diagnostic call. A truncated
    /// answer is re-read once at the reported size when `allow_resize` is
    /// set.
    fn read_last_return(&self, capacity: usize, allow_resize: bool) -> BoletoResult<String> {
        let mut buffer = ResponseBuffer::with_capacity(capacity);
        let code = self.native.last_return(&mut buffer);
        let text = buffer.decode(self.config.encoding);

        if let Some(err) = BoletoError::from_status(code, text.clone()) {
            warn!("{} failed with status {}", bindings::BOLETO_ULTIMO_RETORNO, code);
            return Err(err);
        }

        if buffer.is_truncated() {
            if allow_resize && self.can_recover(buffer.reported_len()) {
                return self.read_last_return(buffer.reported_len(), false);
            }
            warn!(
                "{} response truncated to {} of {} bytes",
                bindings::BOLETO_ULTIMO_RETORNO,
                capacity,
                buffer.reported_len()
            );
        }
        Ok(text)
    }
}

impl<N: NativeBoleto> Drop for Boleto<N> {
    fn drop(&mut self) {
        if self.state != SessionState::Initialized || !self.config.finalize_on_drop {
            return;
        }
        let code = self.native.finalize();
        if status::is_success(code) {
            debug!("ACBrLib Boleto finalized on drop");
        } else {
            warn!("{} failed on drop with status {}", bindings::BOLETO_FINALIZAR, code);
        }
    }
}

fn to_c_int<T>(parameter: &str, value: T) -> BoletoResult<c_int>
where
    T: Copy + std::fmt::Display + TryInto<c_int>,
{
    value.try_into().map_err(|_| BoletoError::InvalidParameter {
        parameter: parameter.to_string(),
        reason: format!("{value} does not fit a native int"),
    })
}

fn to_usize(operation: &str, text: &str) -> BoletoResult<usize> {
    let count = parse_count(operation, text)?;
    usize::try_from(count).map_err(|_| BoletoError::InvalidResponse {
        operation: operation.to_string(),
        text: text.to_string(),
    })
}
