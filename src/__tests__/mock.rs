//! Scripted stand-in for the native library.
//!
//! Each entry point pops the next scripted [`Response`] for its symbol
//! (success with an empty answer when nothing is scripted) and records the
//! call.

use std::collections::{HashMap, VecDeque};
use std::ffi::CStr;
use std::os::raw::c_int;
use std::sync::{Arc, Mutex};

use crate::ffi::bindings::*;
use crate::ffi::buffer::ResponseBuffer;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: c_int,
    pub answer: Vec<u8>,
    pub reported_len: Option<c_int>,
}

impl Response {
    pub fn ok(answer: &str) -> Self {
        Self::bytes(0, answer.as_bytes())
    }

    pub fn status(status: c_int) -> Self {
        Self::bytes(status, b"")
    }

    pub fn failed(status: c_int, answer: &str) -> Self {
        Self::bytes(status, answer.as_bytes())
    }

    pub fn bytes(status: c_int, answer: &[u8]) -> Self {
        Self {
            status,
            answer: answer.to_vec(),
            reported_len: None,
        }
    }

    pub fn reporting(mut self, len: c_int) -> Self {
        self.reported_len = Some(len);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub symbol: &'static str,
    pub args: Vec<String>,
    pub capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    responses: HashMap<&'static str, VecDeque<Response>>,
    calls: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct MockNative {
    state: Arc<Mutex<State>>,
    alternate_available: bool,
}

impl Default for MockNative {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNative {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            alternate_available: true,
        }
    }

    pub fn without_alternate() -> Self {
        Self {
            alternate_available: false,
            ..Self::new()
        }
    }

    /// Queue a response for the next call to `symbol`
    pub fn script(&self, symbol: &'static str, response: Response) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(symbol)
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|call| call.symbol).collect()
    }

    pub fn count(&self, symbol: &str) -> usize {
        self.calls().iter().filter(|call| call.symbol == symbol).count()
    }

    pub fn last_call(&self, symbol: &str) -> Option<Call> {
        self.calls().into_iter().rev().find(|call| call.symbol == symbol)
    }

    fn respond(
        &self,
        symbol: &'static str,
        args: &[&CStr],
        buffer: Option<&mut ResponseBuffer>,
    ) -> c_int {
        let args = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.respond_raw(symbol, args, buffer)
    }

    fn respond_raw(
        &self,
        symbol: &'static str,
        args: Vec<String>,
        buffer: Option<&mut ResponseBuffer>,
    ) -> c_int {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            symbol,
            args,
            capacity: buffer.as_ref().map(|b| b.capacity()),
        });
        let response = state
            .responses
            .get_mut(symbol)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Response::ok(""));

        if let Some(buffer) = buffer {
            buffer.write(&response.answer);
            if let Some(len) = response.reported_len {
                buffer.set_reported_len(len);
            }
        }
        response.status
    }
}

impl NativeBoleto for MockNative {
    fn initialize(&self, config_file: &CStr, crypto_key: &CStr) -> c_int {
        self.respond(BOLETO_INICIALIZAR, &[config_file, crypto_key], None)
    }

    fn initialize_alternate(&self, config_file: &CStr, crypto_key: &CStr) -> Option<c_int> {
        self.alternate_available
            .then(|| self.respond(SAT_INICIALIZAR, &[config_file, crypto_key], None))
    }

    fn finalize(&self) -> c_int {
        self.respond(BOLETO_FINALIZAR, &[], None)
    }

    fn last_return(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_ULTIMO_RETORNO, &[], Some(buffer))
    }

    fn name(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_NOME, &[], Some(buffer))
    }

    fn version(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_VERSAO, &[], Some(buffer))
    }

    fn config_read(&self, config_file: &CStr) -> c_int {
        self.respond(BOLETO_CONFIG_LER, &[config_file], None)
    }

    fn config_write(&self, config_file: &CStr) -> c_int {
        self.respond(BOLETO_CONFIG_GRAVAR, &[config_file], None)
    }

    fn config_read_value(&self, section: &CStr, key: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_CONFIG_LER_VALOR, &[section, key], Some(buffer))
    }

    fn config_write_value(&self, section: &CStr, key: &CStr, value: &CStr) -> c_int {
        self.respond(BOLETO_CONFIG_GRAVAR_VALOR, &[section, key, value], None)
    }

    fn configure_data(&self, ini: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_CONFIGURAR_DADOS, &[ini], Some(buffer))
    }

    fn include_titles(&self, ini: &CStr, output: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_INCLUIR_TITULOS, &[ini, output], Some(buffer))
    }

    fn clear_list(&self) -> c_int {
        self.respond(BOLETO_LIMPAR_LISTA, &[], None)
    }

    fn total_titles(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_TOTAL_TITULOS_LISTA, &[], Some(buffer))
    }

    fn print(&self, printer: &CStr) -> c_int {
        self.respond(BOLETO_IMPRIMIR, &[printer], None)
    }

    fn print_title(&self, index: c_int, printer: &CStr) -> c_int {
        let args = vec![index.to_string(), printer.to_string_lossy().into_owned()];
        self.respond_raw(BOLETO_IMPRIMIR_BOLETO, args, None)
    }

    fn generate_pdf(&self) -> c_int {
        self.respond(BOLETO_GERAR_PDF, &[], None)
    }

    fn generate_html(&self) -> c_int {
        self.respond(BOLETO_GERAR_HTML, &[], None)
    }

    fn generate_remittance(&self, directory: &CStr, number: c_int, file_name: &CStr) -> c_int {
        let args = vec![
            directory.to_string_lossy().into_owned(),
            number.to_string(),
            file_name.to_string_lossy().into_owned(),
        ];
        self.respond_raw(BOLETO_GERAR_REMESSA, args, None)
    }

    fn read_return(&self, directory: &CStr, file_name: &CStr) -> c_int {
        self.respond(BOLETO_LER_RETORNO, &[directory, file_name], None)
    }

    fn send_email(&self, to: &CStr, subject: &CStr, message: &CStr, cc: &CStr) -> c_int {
        self.respond(BOLETO_ENVIAR_EMAIL, &[to, subject, message, cc], None)
    }

    fn set_output_file(&self, directory: &CStr, file: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_SET_DIRETORIO_ARQUIVO, &[directory, file], Some(buffer))
    }

    fn list_banks(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_LISTA_BANCOS, &[], Some(buffer))
    }

    fn list_title_characteristics(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_LISTA_CARACT_TITULO, &[], Some(buffer))
    }

    fn list_occurrences(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_LISTA_OCORRENCIAS, &[], Some(buffer))
    }

    fn list_occurrences_ex(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_LISTA_OCORRENCIAS_EX, &[], Some(buffer))
    }

    fn our_number_length(
        &self,
        wallet: &CStr,
        our_number: &CStr,
        agreement: &CStr,
        buffer: &mut ResponseBuffer,
    ) -> c_int {
        self.respond(BOLETO_TAM_NOSSO_NUMERO, &[wallet, our_number, agreement], Some(buffer))
    }

    fn accepted_late_fee_codes(&self, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_CODIGOS_MORA_ACEITOS, &[], Some(buffer))
    }

    fn select_bank(&self, bank_code: &CStr, buffer: &mut ResponseBuffer) -> c_int {
        self.respond(BOLETO_SELECIONA_BANCO, &[bank_code], Some(buffer))
    }

    fn build_our_number(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int {
        self.respond_raw(BOLETO_MONTAR_NOSSO_NUMERO, vec![index.to_string()], Some(buffer))
    }

    fn typeable_line(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int {
        self.respond_raw(BOLETO_RETORNA_LINHA_DIGITAVEL, vec![index.to_string()], Some(buffer))
    }

    fn barcode(&self, index: c_int, buffer: &mut ResponseBuffer) -> c_int {
        self.respond_raw(BOLETO_RETORNA_CODIGO_BARRAS, vec![index.to_string()], Some(buffer))
    }
}
