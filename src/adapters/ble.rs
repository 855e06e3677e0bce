//! BLE command transport adapter.
//!
//! One GATT service with a write characteristic (inbound commands) and a
//! notify characteristic (outbound suggestions / status reports). The
//! write callback runs on the Bluedroid host task and only pushes the raw
//! payload into the SPSC queue in [`crate::events`]; all parsing and
//! dispatch happens on the main loop.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid BLE GATT server via `esp_idf_svc::sys`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                                    | Perms        |
//! |----------------|-----------------------------------------|--------------|
//! | Command RX     | `beb5483e-36e1-4688-b7f5-ea07361b26a8`  | Write        |
//! | Report TX      | `beb5483f-36e1-4688-b7f5-ea07361b26a8`  | Read+Notify  |

use log::info;

use crate::app::ports::NotificationPort;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x4fafc201_1fb5_459e_8fcc_c5c9c331914b;
pub const CHAR_COMMAND_RX: u128 = 0xbeb5483e_36e1_4688_b7f5_ea07361b26a8;
pub const CHAR_REPORT_TX: u128 = 0xbeb5483f_36e1_4688_b7f5_ea07361b26a8;

pub const DEVICE_NAME: &str = "SmartSync";

// ───────────────────────────────────────────────────────────────
// BLE state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    Advertising,
    Connected,
    Failed,
}

// ── ESP-IDF BLE static state ──────────────────────────────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures. These atomics bridge the callback context to the adapter.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

#[cfg(target_os = "espidf")]
static BLE_GATTS_IF: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CONN_ID: AtomicU32 = AtomicU32::new(u32::MAX);
#[cfg(target_os = "espidf")]
static BLE_SVC_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_RX_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_TX_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CHAR_STEP: AtomicU32 = AtomicU32::new(0);

#[cfg(target_os = "espidf")]
fn uuid128_to_esp(uuid: u128) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 16;
    unsafe {
        t.uuid.uuid128 = uuid.to_le_bytes();
    }
    t
}

#[cfg(target_os = "espidf")]
unsafe fn add_gatt_char(svc_handle: u16, uuid: u128, perm: u32, prop: u32) {
    use esp_idf_svc::sys::*;
    let mut char_uuid = uuid128_to_esp(uuid);
    unsafe {
        esp_ble_gatts_add_char(
            svc_handle,
            &mut char_uuid,
            perm as esp_gatt_perm_t,
            prop as esp_gatt_char_prop_t,
            core::ptr::null_mut(),
            core::ptr::null_mut(),
        );
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    BLE_GATTS_IF.store(gatts_if as u32, AtomicOrdering::Relaxed);

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let svc_uuid = uuid128_to_esp(SERVICE_UUID);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: svc_uuid,
                    inst_id: 0,
                },
                is_primary: true,
            };
            unsafe {
                esp_ble_gatts_create_service(gatts_if, &mut svc_id, 8);
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let p = unsafe { &(*param).create };
            let svc_handle = p.service_handle;
            BLE_SVC_HANDLE.store(svc_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: service created (handle={})", svc_handle);
            unsafe {
                esp_ble_gatts_start_service(svc_handle);
            }
            BLE_CHAR_STEP.store(1, AtomicOrdering::Relaxed);
            unsafe {
                add_gatt_char(
                    svc_handle,
                    CHAR_COMMAND_RX,
                    ESP_GATT_PERM_WRITE,
                    ESP_GATT_CHAR_PROP_BIT_WRITE | ESP_GATT_CHAR_PROP_BIT_WRITE_NR,
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let p = unsafe { &(*param).add_char };
            let handle = p.attr_handle;
            let svc_handle = BLE_SVC_HANDLE.load(AtomicOrdering::Relaxed) as u16;
            match BLE_CHAR_STEP.load(AtomicOrdering::Relaxed) {
                1 => {
                    BLE_RX_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: command RX char (handle={})", handle);
                    BLE_CHAR_STEP.store(2, AtomicOrdering::Relaxed);
                    unsafe {
                        add_gatt_char(
                            svc_handle,
                            CHAR_REPORT_TX,
                            ESP_GATT_PERM_READ,
                            ESP_GATT_CHAR_PROP_BIT_READ | ESP_GATT_CHAR_PROP_BIT_NOTIFY,
                        );
                    }
                }
                2 => {
                    BLE_TX_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    BLE_CHAR_STEP.store(3, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: report TX char (handle={}) — all registered", handle);
                }
                _ => {}
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = unsafe { &(*param).connect };
            BLE_CONN_ID.store(p.conn_id as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: client connected (conn_id={})", p.conn_id);
            crate::drivers::hw_init::gpio_write(crate::pins::STATUS_LED_GPIO, true);
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            BLE_CONN_ID.store(u32::MAX, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: client disconnected");
            crate::drivers::hw_init::gpio_write(crate::pins::STATUS_LED_GPIO, false);
            // Restart advertising after disconnect.
            let mut adv_params = esp_ble_adv_params_t {
                adv_int_min: 0x20,
                adv_int_max: 0x40,
                adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
                own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
                channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
                adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
                ..unsafe { core::mem::zeroed() }
            };
            unsafe {
                esp_ble_gap_start_advertising(&mut adv_params);
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = unsafe { &(*param).write };
            if p.handle as u32 == BLE_RX_CHAR_HANDLE.load(AtomicOrdering::Relaxed) {
                let data = unsafe { core::slice::from_raw_parts(p.value, p.len as usize) };
                // Bluedroid task: hand off to the main loop, never parse here.
                if !crate::events::push_payload(data) {
                    log::warn!("BLE GATTS: command queue full, payload dropped");
                }
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleAdapter {
    state: BleState,
    /// Simulation: notifications captured for test assertions.
    #[cfg(not(target_os = "espidf"))]
    sim_sent: Vec<String>,
}

impl BleAdapter {
    pub fn new() -> Self {
        Self {
            state: BleState::Idle,
            #[cfg(not(target_os = "espidf"))]
            sim_sent: Vec::new(),
        }
    }

    /// Bring up the stack and start advertising.
    pub fn start(&mut self) {
        info!("BLE: starting advertising as '{}'", DEVICE_NAME);
        self.platform_start();
        if self.state != BleState::Failed {
            self.state = BleState::Advertising;
        }
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    /// Whether a central is currently connected.
    #[cfg(target_os = "espidf")]
    pub fn is_connected(&self) -> bool {
        BLE_CONN_ID.load(AtomicOrdering::Relaxed) != u32::MAX
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_connected(&self) -> bool {
        self.state == BleState::Connected
    }

    /// Simulation helpers for host-side tests.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_connect(&mut self) {
        self.state = BleState::Connected;
    }

    /// Inject an inbound command as if a central had written the RX char.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_receive(&mut self, payload: &[u8]) -> bool {
        crate::events::push_payload(payload)
    }

    /// Notifications sent so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_sent(&self) -> &[String] {
        &self.sim_sent
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) {
        use esp_idf_svc::sys::*;
        use log::error;
        unsafe {
            // Release classic BT memory (BLE-only mode saves ~30 KB).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            let ret = esp_bt_controller_init(&mut bt_cfg);
            if ret != ESP_OK as i32 {
                error!("BLE: bt_controller_init failed ({})", ret);
                self.state = BleState::Failed;
                return;
            }

            let ret = esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE);
            if ret != ESP_OK as i32 {
                error!("BLE: bt_controller_enable failed ({})", ret);
                self.state = BleState::Failed;
                return;
            }

            let ret = esp_bluedroid_init();
            if ret != ESP_OK as i32 {
                error!("BLE: bluedroid_init failed ({})", ret);
                self.state = BleState::Failed;
                return;
            }

            let ret = esp_bluedroid_enable();
            if ret != ESP_OK as i32 {
                error!("BLE: bluedroid_enable failed ({})", ret);
                self.state = BleState::Failed;
                return;
            }

            // Register GAP and GATTS callbacks; service and characteristic
            // creation continues in the GATTS event handler.
            esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            esp_ble_gatts_register_callback(Some(ble_gatts_event_handler));
            esp_ble_gatts_app_register(0);

            // Set device name for advertising.
            esp_ble_gap_set_device_name(b"SmartSync\0".as_ptr() as *const _);

            let mut adv_params = esp_ble_adv_params_t {
                adv_int_min: 0x20,
                adv_int_max: 0x40,
                adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
                own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
                channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
                adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
                ..core::mem::zeroed()
            };
            esp_ble_gap_start_advertising(&mut adv_params);

            info!("BLE(espidf): Bluedroid stack initialized, advertising as '{}'", DEVICE_NAME);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) {
        info!("BLE(sim): advertising '{}' (service {:032x})", DEVICE_NAME, SERVICE_UUID);
    }
}

impl Default for BleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// NotificationPort implementation
// ───────────────────────────────────────────────────────────────

impl NotificationPort for BleAdapter {
    #[cfg(target_os = "espidf")]
    fn notify(&mut self, text: &str) {
        use esp_idf_svc::sys::*;
        let handle = BLE_TX_CHAR_HANDLE.load(AtomicOrdering::Relaxed);
        let conn = BLE_CONN_ID.load(AtomicOrdering::Relaxed);
        // Best-effort: silently a no-op when no peer is connected.
        if handle == 0 || conn == u32::MAX {
            return;
        }
        unsafe {
            esp_ble_gatts_send_indicate(
                BLE_GATTS_IF.load(AtomicOrdering::Relaxed) as u8,
                conn as u16,
                handle as u16,
                text.len() as u16,
                text.as_ptr() as *mut u8,
                false, // notify, no confirmation
            );
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn notify(&mut self, text: &str) {
        if self.state == BleState::Connected {
            self.sim_sent.push(text.to_string());
        }
    }
}
