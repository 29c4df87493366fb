//! 设备类与设备节点
//!
//! 模拟 `class_create()` / `device_create()`：设备类是一组节点的容器，
//! 节点是用户可以按名字打开的 `/dev/<node>` 入口，指向一个设备号。

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use sync::SpinLock;

use crate::{DeviceIdentity, ServiceError};

/// 已创建的设备类
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHandle {
    name: String,
}

impl ClassHandle {
    /// 设备类名
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 已发布的设备节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    class: String,
    node: String,
    devno: u64,
}

impl DeviceHandle {
    /// 所属设备类名
    pub fn class(&self) -> &str {
        &self.class
    }

    /// 节点名（`/dev` 下的文件名）
    pub fn node(&self) -> &str {
        &self.node
    }

    /// 节点指向的设备号
    pub fn devno(&self) -> u64 {
        self.devno
    }
}

/// 设备命名空间服务
pub trait NamespaceService: Send + Sync {
    /// 创建设备类
    fn create_class(&self, name: &str) -> Result<ClassHandle, ServiceError>;

    /// 销毁设备类；类下仍有节点时拒绝销毁
    fn destroy_class(&self, class: &ClassHandle);

    /// 在 `class` 下发布名为 `node` 的节点，指向 `identity`
    fn publish(
        &self,
        class: &ClassHandle,
        identity: &DeviceIdentity,
        node: &str,
    ) -> Result<DeviceHandle, ServiceError>;

    /// 撤销节点；节点不存在时忽略
    fn unpublish(&self, device: &DeviceHandle);
}

struct NodeEntry {
    class: String,
    devno: u64,
}

#[derive(Default)]
struct Tables {
    /// 类名 -> 类下的节点名
    classes: BTreeMap<String, BTreeSet<String>>,
    /// 节点名 -> 节点
    nodes: BTreeMap<String, NodeEntry>,
}

/// 内存中的设备命名空间
pub struct DevNamespace {
    tables: SpinLock<Tables>,
}

impl DevNamespace {
    /// 创建空的命名空间
    pub const fn new() -> Self {
        Self {
            tables: SpinLock::new(Tables {
                classes: BTreeMap::new(),
                nodes: BTreeMap::new(),
            }),
        }
    }

    /// 按节点名查找设备号
    pub fn lookup(&self, node: &str) -> Option<u64> {
        self.tables.lock().nodes.get(node).map(|entry| entry.devno)
    }

    /// 设备类是否存在
    pub fn has_class(&self, name: &str) -> bool {
        self.tables.lock().classes.contains_key(name)
    }

    /// 设备类数量
    pub fn class_count(&self) -> usize {
        self.tables.lock().classes.len()
    }

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.tables.lock().nodes.len()
    }

    /// 列出设备类下的全部节点名
    pub fn nodes_in(&self, class: &str) -> Vec<String> {
        self.tables
            .lock()
            .classes
            .get(class)
            .map(|nodes| nodes.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for DevNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceService for DevNamespace {
    fn create_class(&self, name: &str) -> Result<ClassHandle, ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::InvalidArgument);
        }
        let mut tables = self.tables.lock();
        if tables.classes.contains_key(name) {
            return Err(ServiceError::AlreadyExists);
        }
        tables.classes.insert(name.to_string(), BTreeSet::new());
        Ok(ClassHandle {
            name: name.to_string(),
        })
    }

    fn destroy_class(&self, class: &ClassHandle) {
        let mut tables = self.tables.lock();
        match tables.classes.get(class.name()) {
            Some(nodes) if !nodes.is_empty() => {
                log::error!(
                    "namespace: class {} still has {} node(s), not destroyed",
                    class.name(),
                    nodes.len()
                );
            }
            Some(_) => {
                tables.classes.remove(class.name());
            }
            None => log::debug!("namespace: class {} already destroyed", class.name()),
        }
    }

    fn publish(
        &self,
        class: &ClassHandle,
        identity: &DeviceIdentity,
        node: &str,
    ) -> Result<DeviceHandle, ServiceError> {
        if node.is_empty() {
            return Err(ServiceError::InvalidArgument);
        }
        let mut tables = self.tables.lock();
        if tables.nodes.contains_key(node) {
            return Err(ServiceError::AlreadyExists);
        }
        let members = tables
            .classes
            .get_mut(class.name())
            .ok_or(ServiceError::NotFound)?;
        members.insert(node.to_string());
        tables.nodes.insert(
            node.to_string(),
            NodeEntry {
                class: class.name().to_string(),
                devno: identity.devno(),
            },
        );
        Ok(DeviceHandle {
            class: class.name().to_string(),
            node: node.to_string(),
            devno: identity.devno(),
        })
    }

    fn unpublish(&self, device: &DeviceHandle) {
        let mut tables = self.tables.lock();
        let owned = tables
            .nodes
            .get(device.node())
            .is_some_and(|entry| entry.devno == device.devno() && entry.class == device.class());
        if !owned {
            log::debug!("namespace: node {} not published", device.node());
            return;
        }
        tables.nodes.remove(device.node());
        if let Some(members) = tables.classes.get_mut(device.class()) {
            members.remove(device.node());
        }
    }
}
